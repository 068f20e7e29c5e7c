use std::fs;
use std::path::Path;

use hardmon_platform::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CPUINFO: &str = "\
processor\t: 0
model name\t: Test CPU
cpu MHz\t\t: 3400.000

processor\t: 1
model name\t: Test CPU
cpu MHz\t\t: 2200.000
";

const MEMINFO: &str = "\
MemTotal:       16000000 kB
MemFree:         2000000 kB
MemAvailable:    8000000 kB
";

const PM_INFO: &str = "\
GFX Clocks and Power:
\t1000 MHz (MCLK)
\t300 MHz (SCLK)

GPU Temperature: 45 C
GPU Load: 12 %
MEM Load: 3 %
";

struct Fixture {
    dir: TempDir,
    paths: SensorPaths,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let paths = SensorPaths {
            cpuinfo: root.join("cpuinfo"),
            loadavg: root.join("loadavg"),
            meminfo: root.join("meminfo"),
            cpu_temp: root.join("temp1_input"),
            energy: root.join("energy_uj"),
            amdgpu_pm_info: root.join("amdgpu_pm_info"),
            nvidia_device: root.join("nvidia0"),
            nvidia_tool: root.join("nvidia-smi"),
        };

        fs::write(&paths.cpuinfo, CPUINFO).unwrap();
        fs::write(&paths.loadavg, "0.52 0.58 0.59 1/389 12345\n").unwrap();
        fs::write(&paths.meminfo, MEMINFO).unwrap();
        fs::write(&paths.cpu_temp, "41500\n").unwrap();

        Self { dir, paths }
    }

    fn write(&self, path: &Path, content: &str) {
        assert!(path.starts_with(self.dir.path()));
        fs::write(path, content).unwrap();
    }
}

#[cfg(unix)]
fn install_tool(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn keys(record: &MetricRecord) -> Vec<&str> {
    record.keys().collect()
}

#[test]
fn no_gpu_record_has_only_cpu_and_memory_keys() {
    let fixture = Fixture::new();
    let mut collector = Collector::new(&fixture.paths).unwrap();

    assert!(!collector.capabilities().has_gpu());

    let record = collector.collect_at(1704067200).unwrap();

    assert_eq!(record.time, 1704067200);
    assert_eq!(
        keys(&record),
        vec!["cpu0_clk", "cpu1_clk", "cpu_load", "cpu_temp", "mem_available", "mem_used"]
    );
}

#[test]
fn memory_values_end_to_end() {
    let fixture = Fixture::new();
    let mut collector = Collector::new(&fixture.paths).unwrap();

    let record = collector.collect().unwrap();

    assert_eq!(record.get("mem_used"), Some(&MetricValue::Int(8_000_000)));
    assert_eq!(record.get("mem_available"), Some(&MetricValue::Int(8_000_000)));
    assert_eq!(record.get("cpu_temp"), Some(&MetricValue::Float(41.5)));
    assert_eq!(record.get("cpu_load"), Some(&MetricValue::from("0.52")));
}

#[test]
fn first_tick_never_reports_cpu_power() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.energy, "1000000000\n");
    let mut collector = Collector::new(&fixture.paths).unwrap();
    assert!(collector.capabilities().powercap);

    let first = collector.collect().unwrap();
    assert!(!first.contains_key("cpu_power"));

    fixture.write(&fixture.paths.energy, "1025000000\n");
    let second = collector.collect().unwrap();
    let watts = second.get("cpu_power").and_then(MetricValue::as_f64);
    assert!(watts.is_some_and(|w| w > 0.0));
}

#[test]
fn power_capping_disappearing_is_tolerated() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.energy, "1000000000\n");
    let mut collector = Collector::new(&fixture.paths).unwrap();

    collector.collect().unwrap();
    fs::remove_file(&fixture.paths.energy).unwrap();

    let record = collector.collect().unwrap();
    assert!(!record.contains_key("cpu_power"));
    assert!(record.contains_key("mem_used"));
}

#[test]
fn amd_metrics_merged_when_detected() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.amdgpu_pm_info, PM_INFO);
    let mut collector = Collector::new(&fixture.paths).unwrap();

    assert!(collector.capabilities().amd_gpu);

    let record = collector.collect().unwrap();
    assert_eq!(record.get("gpu_temp"), Some(&MetricValue::from("45 C")));
    assert_eq!(record.get("gpu_load"), Some(&MetricValue::from("12 %")));
    assert_eq!(record.get("vram_load"), Some(&MetricValue::from("3 %")));
    assert_eq!(record.get("sclk"), Some(&MetricValue::from("300 MHz")));
    assert!(record.contains_key("cpu0_clk"));
}

#[test]
fn nvidia_device_without_tool_reports_nothing() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.nvidia_device, "");
    let mut collector = Collector::new(&fixture.paths).unwrap();

    assert!(collector.capabilities().nvidia_gpu);
    assert!(collector.capabilities().nvidia_tool.is_none());

    let record = collector.collect().unwrap();
    assert!(!record.contains_key("gpu_load"));
    assert_eq!(record.len(), 6);
}

#[cfg(unix)]
#[test]
fn nvidia_query_output_is_merged() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.nvidia_device, "");
    install_tool(
        &fixture.paths.nvidia_tool,
        "\
[ \"$1\" = \"--query-gpu=clocks.current.graphics,clocks.current.memory,temperature.gpu,\
utilization.gpu,utilization.memory,power.draw,memory.used,memory.total\" ] || exit 3
[ \"$2\" = \"--format=csv\" ] || exit 4
echo 'clocks.current.graphics [MHz], clocks.current.memory [MHz], temperature.gpu, \
utilization.gpu [%], utilization.memory [%], power.draw [W], memory.used [MiB], \
memory.total [MiB]'
echo '1395 MHz, 6801 MHz, 45, 12 %, 5 %, 35.12 W, 1024 MiB, 8192 MiB'
",
    );
    let mut collector = Collector::new(&fixture.paths).unwrap();

    assert_eq!(
        collector.capabilities().nvidia_tool.as_deref(),
        Some(fixture.paths.nvidia_tool.as_path())
    );

    let record = collector.collect().unwrap();

    assert_eq!(record.len(), 14);
    for key in [
        "clocks.gpu.graphics",
        "clocks.gpu.memory",
        "gpu_temp",
        "vram_load",
        "vram_used",
        "vram_total",
    ] {
        assert!(record.contains_key(key), "missing {}", key);
    }
    assert_eq!(record.get("gpu_load"), Some(&MetricValue::from(" 12 %")));
    assert_eq!(record.get("average_gpu"), Some(&MetricValue::from(" 35.12 W")));
    assert!(record.contains_key("mem_used"));
}

#[cfg(unix)]
#[test]
fn nvidia_tool_failure_is_dropped_for_the_tick() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.nvidia_device, "");
    install_tool(&fixture.paths.nvidia_tool, "echo 'GPU is lost' >&2\nexit 9\n");
    let mut collector = Collector::new(&fixture.paths).unwrap();

    assert!(collector.capabilities().nvidia_tool.is_some());

    let record = collector.collect().unwrap();
    assert_eq!(
        keys(&record),
        vec!["cpu0_clk", "cpu1_clk", "cpu_load", "cpu_temp", "mem_available", "mem_used"]
    );
}

#[test]
fn malformed_reader_output_is_dropped_for_the_tick() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.amdgpu_pm_info, "GPU Load 12 %\n");
    fixture.write(&fixture.paths.meminfo, "MemTotal: 1024 kB\n");
    let mut collector = Collector::new(&fixture.paths).unwrap();

    let record = collector.collect().unwrap();

    assert!(!record.contains_key("gpu_load"));
    assert!(!record.contains_key("mem_used"));
    assert!(record.contains_key("cpu_load"));

    fixture.write(&fixture.paths.meminfo, MEMINFO);
    let record = collector.collect().unwrap();
    assert!(record.contains_key("mem_used"));
}

#[test]
fn missing_baseline_interface_fails_startup() {
    let fixture = Fixture::new();
    fs::remove_file(&fixture.paths.cpu_temp).unwrap();

    let err = Collector::new(&fixture.paths).err().unwrap();
    assert!(matches!(err, SensorError::MissingInterface { .. }));
    assert!(!err.is_soft());
}

#[test]
fn unreadable_baseline_interface_is_fatal_for_the_tick() {
    let fixture = Fixture::new();
    let mut collector = Collector::new(&fixture.paths).unwrap();
    fs::remove_file(&fixture.paths.meminfo).unwrap();

    let err = collector.collect().unwrap_err();
    assert!(matches!(err, SensorError::Io { .. }));
}

#[test]
fn explicit_capabilities_gate_readers() {
    let fixture = Fixture::new();
    fixture.write(&fixture.paths.amdgpu_pm_info, PM_INFO);

    let mut collector =
        Collector::with_capabilities(&fixture.paths, HardwareCapabilities::default()).unwrap();

    let record = collector.collect().unwrap();
    assert!(!record.contains_key("gpu_temp"));
}
