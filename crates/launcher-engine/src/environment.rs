//! Runtime environment logging.

use crate::metrics::EnvironmentInfo;
use tracing::info;

/// Log and capture runtime environment information.
pub fn log_runtime_environment() -> EnvironmentInfo {
    info!("=== Runtime Environment ===");

    let cpu_cores = num_cpus::get();
    info!("CPU cores visible: {}", cpu_cores);

    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    let memory_mb = sys.total_memory() / 1024 / 1024;
    let available_memory_mb = sys.available_memory() / 1024 / 1024;
    info!("Total memory: {} MB", memory_mb);
    info!("Available memory: {} MB", available_memory_mb);

    info!("===========================");

    EnvironmentInfo {
        cpu_cores,
        memory_mb,
        available_memory_mb,
    }
}

/// Worker count used when none is configured.
pub fn default_worker_count() -> usize {
    num_cpus::get()
}

/// Warn about settings that are likely to saturate this machine.
pub fn check_worker_count(worker_count: usize, env: &EnvironmentInfo) -> Vec<String> {
    let mut warnings = Vec::new();
    if worker_count > env.cpu_cores * 2 {
        warnings.push(format!(
            "{} workers requested but only {} CPU cores visible",
            worker_count, env.cpu_cores
        ));
    }
    warnings
}
