use anyhow::Result;

use super::Vfs;

pub fn execute(vfs: &Vfs) -> Result<()> {
    for name in vfs.list_root_names()? {
        println!("{name}");
    }
    Ok(())
}
