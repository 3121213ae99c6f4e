fn main() {
    cc::Build::new()
        .file("csrc/probes.c")
        .warnings(true)
        .flag_if_supported("-std=c99")
        .flag_if_supported("-O2")
        .compile("devaarg_probes");

    println!("cargo:rerun-if-changed=csrc/probes.c");
    println!("cargo:rerun-if-changed=build.rs");
}
