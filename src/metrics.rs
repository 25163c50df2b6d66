//! # Métricas do Processo
//!
//! Snapshot de recursos coletado ao fim de cada classificação, registrado
//! em log e exibido como rodapé na página de resultado.
//!
//! | Métrica | Fonte |
//! |---------|-------|
//! | RAM do processo / total (MB) | `sysinfo` |
//! | Cores ativos / total / pico por core | `sysinfo` |
//! | Throughput (chars/s) | calculado pelo pipeline |
//!
//! ## Estado Persistente (System singleton)
//!
//! O uso de CPU do `sysinfo` é um delta em relação à coleta anterior,
//! então uma única instância [`System`] vive durante todo o processo,
//! atrás de [`OnceLock`] + [`Mutex`].

use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

static SYS: OnceLock<Mutex<System>> = OnceLock::new();

fn system() -> &'static Mutex<System> {
    SYS.get_or_init(|| {
        let mut s = System::new();
        s.refresh_cpu_usage(); // baseline para deltas futuros
        Mutex::new(s)
    })
}

/// Snapshot de recursos do processo.
#[derive(Clone, Debug, Serialize)]
pub struct ProcessMetrics {
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,
    /// Cores com uso acima de 1%.
    pub cpu_active_cores: usize,
    pub cpu_max_core_percent: f32,
    pub cpu_total_cores: usize,
    /// Ex: "1234 chars/s".
    pub throughput: Option<String>,
}

pub fn collect_metrics(throughput: Option<String>) -> ProcessMetrics {
    let pid = Pid::from_u32(std::process::id());

    let mut sys = system().lock();
    sys.refresh_memory();
    sys.refresh_cpu_usage();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), false);

    let memory_used_mb = sys
        .process(pid)
        .map(|p| p.memory() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0);
    let memory_total_mb = sys.total_memory() as f64 / (1024.0 * 1024.0);

    let cpus = sys.cpus();
    let cpu_max_core_percent = cpus.iter().map(|c| c.cpu_usage()).fold(0.0f32, f32::max);

    ProcessMetrics {
        memory_used_mb,
        memory_total_mb,
        cpu_active_cores: cpus.iter().filter(|c| c.cpu_usage() > 1.0).count(),
        cpu_max_core_percent,
        cpu_total_cores: cpus.len(),
        throughput,
    }
}

/// Throughput formatado a partir do tamanho do texto e do tempo gasto.
pub fn throughput(chars: usize, elapsed_ms: u64) -> String {
    let per_sec = chars as f64 * 1000.0 / elapsed_ms.max(1) as f64;
    format!("{:.0} chars/s", per_sec)
}

impl ProcessMetrics {
    /// Linha única para o rodapé e para o log.
    pub fn summary_line(&self, elapsed_ms: u64) -> String {
        let throughput_part = match &self.throughput {
            Some(t) => format!(" | {}", t),
            None => String::new(),
        };

        format!(
            "{}ms | RAM {:.1}/{:.0} MB | CPU {}/{} cores peak {:.1}%{}",
            elapsed_ms,
            self.memory_used_mb,
            self.memory_total_mb,
            self.cpu_active_cores,
            self.cpu_total_cores,
            self.cpu_max_core_percent,
            throughput_part,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_includes_throughput_when_present() {
        let metrics = ProcessMetrics {
            memory_used_mb: 512.4,
            memory_total_mb: 16384.0,
            cpu_active_cores: 3,
            cpu_max_core_percent: 87.5,
            cpu_total_cores: 8,
            throughput: Some(throughput(2000, 500)),
        };
        assert_eq!(
            metrics.summary_line(500),
            "500ms | RAM 512.4/16384 MB | CPU 3/8 cores peak 87.5% | 4000 chars/s"
        );
    }

    #[test]
    fn zero_elapsed_does_not_divide_by_zero() {
        assert_eq!(throughput(10, 0), "10000 chars/s");
    }

    #[test]
    fn collects_a_live_snapshot() {
        let metrics = collect_metrics(None);
        assert!(metrics.cpu_total_cores >= metrics.cpu_active_cores);
        assert!(metrics.summary_line(1).starts_with("1ms | RAM "));
    }
}
