//! Build-script entry point.
//!
//! Expands to a call that scans the crate, writes generated members under
//! `OUT_DIR/graft/` and reports diagnostics as cargo warnings. Use it inside a
//! `main` returning `Result`.

#[macro_export]
macro_rules! build {
    () => {
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");

        //
        // GENERATED CODE
        //

        $crate::run_build_script()?;
    };
}
