use crate::config::Config;
use serde::Serialize;
use sysinfo::System;

#[derive(Serialize, Debug)]
pub struct SystemInfo {
    pub version: String,
    pub platform: String,
    pub arch: String,
    pub cpus: usize,
    pub cpu_model: String,
    pub memory_total_gb: f64,
    pub memory_free_gb: f64,
}

pub fn get_system_info() -> SystemInfo {
    let mut system = System::new();
    system.refresh_all();

    let memory_total = system.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0;
    let memory_free = system.free_memory() as f64 / 1024.0 / 1024.0 / 1024.0;

    let cpu_count = system.cpus().len();
    let cpu_model = system
        .cpus()
        .first()
        .map(|cpu| cpu.brand().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    SystemInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpus: cpu_count,
        cpu_model,
        memory_total_gb: memory_total,
        memory_free_gb: memory_free,
    }
}

pub fn print_startup_info(config: &Config) {
    let sys_info = get_system_info();

    println!("{}", "=".repeat(60));
    println!("🚀 Video Upload Backend v{}", sys_info.version);
    println!("{}", "=".repeat(60));
    println!("📊 System Information:");
    println!("  Platform: {} ({})", sys_info.platform, sys_info.arch);
    println!("  CPUs: {} ({})", sys_info.cpus, sys_info.cpu_model);
    println!(
        "  Memory: {:.2} GB total, {:.2} GB free",
        sys_info.memory_total_gb, sys_info.memory_free_gb
    );
    println!("  Upload Dir: {:?}", config.upload_dir);
    println!("  Database: {}", config.database.url);
    println!("  Listening: http://{}", config.bind_addr());
    println!("{}", "=".repeat(60));
}
