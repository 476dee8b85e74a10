use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    // Prefer a protoc from the environment, fall back to the vendored binary.
    if env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path().map_err(|e| e.to_string())?;
        env::set_var("PROTOC", protoc);
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .file_descriptor_set_path(out_dir.join("tinkerdb_descriptor.bin"))
        .compile_protos(&["proto/tinkerdb.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/tinkerdb.proto");
    Ok(())
}
