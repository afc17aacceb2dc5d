//! `zlaunch status` – compare installed and latest release names.

use anyhow::Result;
use zlaunch_core::config::LauncherConfig;
use zlaunch_core::Launcher;

pub fn run_status(cfg: &LauncherConfig) -> Result<()> {
    let status = Launcher::new(cfg).status()?;
    println!("executable: {}", cfg.executable_path.display());
    println!("installed:  {}", status.local);
    println!("latest:     {}", status.remote);
    if status.update_available() {
        println!("Update available.");
    } else {
        println!("Up to date.");
    }
    Ok(())
}
