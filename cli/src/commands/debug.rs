use color_eyre::eyre::Result;
use hardmon_platform::{Collector, HardwareCapabilities};

use crate::config::{self, config_path, UserConfig};

fn presence(found: bool) -> &'static str {
    if found {
        "found"
    } else {
        "not found"
    }
}

pub fn run(config: &UserConfig) -> Result<()> {
    println!("hardmon debug information");
    println!("{}", "=".repeat(60));

    let sensors = &config.sensors;

    println!("\n--- Sensor Paths ---");
    for (name, path) in [
        ("cpuinfo", &sensors.cpuinfo),
        ("loadavg", &sensors.loadavg),
        ("meminfo", &sensors.meminfo),
        ("cpu_temp", &sensors.cpu_temp),
        ("energy", &sensors.energy),
        ("amdgpu_pm_info", &sensors.amdgpu_pm_info),
        ("nvidia_device", &sensors.nvidia_device),
    ] {
        println!("{:<16} {} ({})", name, path.display(), presence(path.exists()));
    }

    println!("\n--- Capabilities ---");
    let caps = HardwareCapabilities::detect(sensors);
    println!("AMD GPU:       {}", presence(caps.amd_gpu));
    println!("NVIDIA GPU:    {}", presence(caps.nvidia_gpu));
    match &caps.nvidia_tool {
        Some(tool) => println!("NVIDIA tool:   {}", tool.display()),
        None => println!("NVIDIA tool:   {}", presence(false)),
    }
    println!("Power capping: {}", presence(caps.powercap));

    println!("\n--- Sample ---");
    match Collector::with_capabilities(sensors, caps) {
        Ok(mut collector) => match collector.collect() {
            Ok(record) => println!("{}", record.to_json_pretty()?),
            Err(e) => println!("Collection failed: {}", e),
        },
        Err(e) => println!("Collector unavailable: {}", e),
    }

    println!("\n--- Config Paths ---");
    println!("Config:  {}", config_path().display());
    println!("History: {}", config.history.database_path().display());
    println!("Logs:    {}", config::runtime_dir().display());

    println!("\n--- Current Config ---");
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}
