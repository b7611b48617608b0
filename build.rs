use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fs::{read, read_to_string, write};
use std::path::PathBuf;

fn main() {
    _main().unwrap();
}

#[derive(Deserialize)]
struct CargoConfig<'a> {
    #[serde(borrow = "'a")]
    package: Package<'a>,
}

#[derive(Deserialize)]
struct Package<'a> {
    version: &'a str,
}

fn _main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=resources/welcome.txt");

    let welcome_info = read_to_string("resources/welcome.txt")?;
    let cargo = read("Cargo.toml")?;
    let config: CargoConfig = toml::from_slice(&cargo)?;

    let mut path = PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR not set")?);
    path.push("welcome_info");

    write(
        path,
        welcome_info.replace("${{version}}", config.package.version),
    )?;

    Ok(())
}
