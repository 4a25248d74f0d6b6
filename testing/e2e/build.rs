fn main() -> Result<(), Box<dyn std::error::Error>> {
    graft_build::build!();

    Ok(())
}
