use glass_catalog::scan_manufacturers;
use std::{env, fs};

fn main() -> anyhow::Result<()> {
    let path = env::args().nth(1).unwrap_or_else(|| "data/glass.js".to_string());
    let content = fs::read_to_string(&path)?;

    let scan = scan_manufacturers(&content);
    for dup in &scan.duplicates {
        println!(
            "DUPLICATE: Glass \"{}\" has {} manufacturer fields (line {})",
            dup.name, dup.count, dup.line
        );
    }

    println!("\n{}", "=".repeat(60));
    println!("Total glasses checked: {}", scan.total_glasses);
    println!(
        "Glasses with duplicate manufacturer fields: {}",
        scan.duplicates.len()
    );

    if scan.duplicates.is_empty() {
        println!("No duplicate manufacturer fields found");
    } else {
        println!(
            "Found {} glasses with duplicate manufacturer fields",
            scan.duplicates.len()
        );
        std::process::exit(1);
    }
    Ok(())
}
