use std::env;
use std::path::PathBuf;

// ffmpeg-sys-next locates FFmpeg via pkg-config on unix but needs a hand on
// Windows; emit hints so a vcpkg install is picked up without manual setup.
fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_DYNAMIC", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }
    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=FFMPEG_DIR is not set. On Windows, install FFmpeg through vcpkg and export VCPKG_ROOT and FFMPEG_DIR so the build can find it."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let install_dir = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);

    if install_dir.exists() {
        println!(
            "cargo:warning=Found a vcpkg install at {}. Set FFMPEG_DIR={} to make FFmpeg discovery explicit.",
            install_dir.display(),
            install_dir.display(),
        );
        if env::var_os("VCPKGRS_DYNAMIC").is_none() {
            println!(
                "cargo:warning=Set VCPKGRS_DYNAMIC=1 if the vcpkg FFmpeg build is dynamic."
            );
        }
    } else {
        println!(
            "cargo:warning=VCPKG_ROOT is set but {} does not contain an FFmpeg install.",
            install_dir.display(),
        );
    }
}
