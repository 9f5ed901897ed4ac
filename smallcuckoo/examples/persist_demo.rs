use smallcuckoo::{Config, MMapFile, SmallCuckoo};
use std::path::Path;

fn main() -> smallcuckoo::Result<()> {
    println!("=== SmallCuckoo Demo ===\n");

    let dir = std::env::temp_dir().join(format!("smallcuckoo-demo-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;

    demo_in_memory(&dir.join("table.scu"))?;
    demo_mapped(&dir.join("entries.bin"))?;

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

fn demo_in_memory(path: &Path) -> smallcuckoo::Result<()> {
    println!("1. In-memory table with a portable image:");
    let mut table = SmallCuckoo::new(0);
    for key in 1..=1024u64 {
        table.insert(key, key * key);
    }
    println!(
        "   {} pairs in {} slots ({} doublings, load {:.2})",
        table.len(),
        table.table_size(),
        table.growths(),
        table.load_factor()
    );

    table.save(path)?;
    let restored = SmallCuckoo::load(path)?;
    println!(
        "   image is {} bytes; reloaded into {} slots, find(32) = {:?}\n",
        table.encoded_len(),
        restored.table_size(),
        restored.find(32)
    );
    Ok(())
}

fn demo_mapped(path: &Path) -> smallcuckoo::Result<()> {
    println!("2. Entry store in a mapped file:");
    {
        let mut table = SmallCuckoo::<MMapFile>::create_in(path, Config::default())?;
        for key in 0..100u64 {
            table.insert(key << 32, key);
        }
        table.flush()?;
    }

    let table = SmallCuckoo::<MMapFile>::open(path, Config::default())?;
    let total: u64 = table.iter().map(|(_, v)| v).sum();
    println!("   reopened {} pairs, values sum to {}", table.len(), total);
    Ok(())
}
