#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// 記錄每個階段的耗時與記憶體使用量
#[cfg(feature = "cli")]
pub struct RunMonitor {
    system: Mutex<System>,
    pid: Pid,
    started: Instant,
    stages: Mutex<Vec<(String, Duration)>>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();

        let pid = sysinfo::get_current_pid().expect("Failed to get current PID");

        Self {
            system: Mutex::new(system),
            pid,
            started: Instant::now(),
            stages: Mutex::new(Vec::new()),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn memory_mb(&self) -> Option<u64> {
        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        let process = system.process(self.pid)?;
        Some(process.memory() / 1024 / 1024)
    }

    /// 階段結束時呼叫，累計耗時並輸出當下狀態
    pub fn stage_done(&self, stage: &str) {
        if !self.enabled {
            return;
        }

        let elapsed = self.started.elapsed();
        let stage_elapsed = match self.stages.lock() {
            Ok(mut stages) => {
                let previous: Duration = stages.iter().map(|(_, d)| *d).sum();
                let stage_elapsed = elapsed.saturating_sub(previous);
                stages.push((stage.to_string(), stage_elapsed));
                stage_elapsed
            }
            Err(_) => return,
        };

        match self.memory_mb() {
            Some(mb) => tracing::info!(
                "📊 Stage '{}' done in {:?} (memory: {}MB)",
                stage,
                stage_elapsed,
                mb
            ),
            None => tracing::info!("📊 Stage '{}' done in {:?}", stage, stage_elapsed),
        }
    }

    pub fn log_summary(&self) {
        if !self.enabled {
            return;
        }

        if let Ok(stages) = self.stages.lock() {
            for (stage, elapsed) in stages.iter() {
                tracing::info!("📊 {} took {:?}", stage, elapsed);
            }
        }
        tracing::info!("📊 Total run time: {:?}", self.started.elapsed());
    }
}

#[cfg(feature = "cli")]
impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 為非CLI環境提供空實現
#[cfg(not(feature = "cli"))]
pub struct RunMonitor;

#[cfg(not(feature = "cli"))]
impl RunMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn stage_done(&self, _stage: &str) {}

    pub fn log_summary(&self) {}
}
