fn main() {
    tauri_build::try_build(tauri_build::Attributes::new().app_manifest(
        tauri_build::AppManifest::new().commands(&[
            "page_console",
            "page_alert",
            "show_page_menu",
            "shell_status",
        ]),
    ))
    .expect("failed to run tauri-build");
}
