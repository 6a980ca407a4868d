use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// 單一階段的資源快照
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub records: usize,
    pub memory_usage_mb: Option<u64>,
    pub elapsed: Duration,
}

/// 追蹤 ETL 各階段耗時；啟用 `cli` feature 時另外記錄行程記憶體
pub struct SystemMonitor {
    enabled: bool,
    start_time: Instant,
    #[cfg(feature = "cli")]
    system: Mutex<System>,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
    #[cfg(feature = "cli")]
    peak_memory_mb: Mutex<u64>,
}

impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: Instant::now(),
            #[cfg(feature = "cli")]
            system: Mutex::new(System::new()),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
            #[cfg(feature = "cli")]
            peak_memory_mb: Mutex::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(feature = "cli")]
    fn memory_usage_mb(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let memory_mb = system.process(pid)?.memory() / 1024 / 1024;

        let mut peak = self.peak_memory_mb.lock().ok()?;
        if memory_mb > *peak {
            *peak = memory_mb;
        }
        Some(memory_mb)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_usage_mb(&self) -> Option<u64> {
        None
    }

    pub fn snapshot(&self, phase: &str, records: usize) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }

        Some(PhaseStats {
            phase: phase.to_string(),
            records,
            memory_usage_mb: self.memory_usage_mb(),
            elapsed: self.start_time.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str, records: usize) {
        if let Some(stats) = self.snapshot(phase, records) {
            match stats.memory_usage_mb {
                Some(memory) => tracing::info!(
                    "📊 {} - {} records, Memory: {}MB, Time: {:?}",
                    stats.phase,
                    stats.records,
                    memory,
                    stats.elapsed
                ),
                None => tracing::info!(
                    "📊 {} - {} records, Time: {:?}",
                    stats.phase,
                    stats.records,
                    stats.elapsed
                ),
            }
        }
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }

        #[cfg(feature = "cli")]
        {
            let peak = self.peak_memory_mb.lock().map(|p| *p).unwrap_or(0);
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.start_time.elapsed(),
                peak
            );
        }

        #[cfg(not(feature = "cli"))]
        tracing::info!("📊 Final Stats - Total Time: {:?}", self.start_time.elapsed());
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
