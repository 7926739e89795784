use glass_catalog::GlassCatalog;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <agf_file> <var_name>", args[0]);
        std::process::exit(1);
    }
    let catalog = GlassCatalog::from_path(&args[1])?;
    println!("// Parsed {} glasses from {}", catalog.entries.len(), args[1]);
    println!("{}", catalog.to_js_module(&args[2])?);
    Ok(())
}
