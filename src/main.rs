#[cfg(target_os = "linux")]
mod cli {
    use anyhow::{anyhow, Context};
    use clap::{Parser, Subcommand};
    use std::io::BufRead;
    use std::path::PathBuf;
    use std::thread;
    use std::time::Duration;
    use tracing::{info, warn};
    use tracing_subscriber::EnvFilter;
    use vhid::discovery::udev_discovery::UdevDiscovery;
    use vhid::discovery::DeviceDiscovery;
    use vhid::uinput::{AXIS_MAX, AXIS_MIN, DEFAULT_UINPUT_PATH};
    use vhid::{
        codes, presets, CapabilityDescriptor, DeviceOptions, ErrorPolicy, IdentityMode,
        VirtualDevice,
    };

    /// The kernel publishes the event node asynchronously after creation.
    const NODE_LOOKUP_ATTEMPTS: usize = 10;
    const NODE_LOOKUP_INTERVAL: Duration = Duration::from_millis(50);

    const SWEEP_STEPS: i32 = 64;

    #[derive(Parser)]
    #[command(name = "vhid", about = "Virtual keyboard and gamepad over uinput")]
    struct Cli {
        /// Enable debug logging to stderr
        #[arg(short, long, global = true)]
        verbose: bool,

        /// uinput control node
        #[arg(long, global = true, default_value = DEFAULT_UINPUT_PATH)]
        device: PathBuf,

        /// Fail on the first event write error instead of dropping the event
        #[arg(long, global = true)]
        strict: bool,

        /// Write --vendor/--product into the device instead of the legacy ids
        #[arg(long, global = true)]
        use_ids: bool,

        /// Vendor id used with --use-ids
        #[arg(long, global = true, value_parser = parse_hex_u16, default_value = "045e")]
        vendor: u16,

        /// Product id used with --use-ids
        #[arg(long, global = true, value_parser = parse_hex_u16, default_value = "028e")]
        product: u16,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Toggle a key on every line read from stdin (press, release, press, ...)
        Keyboard {
            #[arg(short, long, default_value = "KEY_Q")]
            key: String,
        },
        /// Press the given keys together, hold, then release them
        Tap {
            #[arg(required = true)]
            keys: Vec<String>,

            #[arg(long, default_value_t = 50)]
            hold_ms: u64,
        },
        /// Create an X-Box 360 pad, sweep the left stick and press the south button
        Xbox {
            /// Total time for the stick sweep
            #[arg(long, default_value_t = 1000)]
            sweep_ms: u64,
        },
        /// List known key (or axis) names and their codes
        Codes {
            #[arg(long)]
            axes: bool,
        },
    }

    fn parse_hex_u16(s: &str) -> Result<u16, String> {
        let digits = s.trim_start_matches("0x").trim_start_matches("0X");
        u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex id \"{}\": {}", s, e))
    }

    pub fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();

        let default_level = if cli.verbose { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_writer(std::io::stderr)
            .init();

        let options = DeviceOptions::default()
            .with_path(&cli.device)
            .with_error_policy(if cli.strict {
                ErrorPolicy::Strict
            } else {
                ErrorPolicy::BestEffort
            })
            .with_identity(if cli.use_ids {
                IdentityMode::FromDescriptor
            } else {
                IdentityMode::Legacy
            });

        match cli.command {
            Command::Codes { axes } => {
                let table: Vec<(u16, String)> = if axes {
                    codes::named_axes().collect()
                } else {
                    codes::named_keys().collect()
                };
                for (code, name) in table {
                    println!("{:#06x} {}", code, name);
                }
                Ok(())
            }
            Command::Keyboard { key } => {
                let code = codes::key_code(&key).ok_or_else(|| anyhow!("unknown key {}", key))?;
                let descriptor = presets::keyboard().with_identity(cli.vendor, cli.product);
                let mut kbd = create(&descriptor, options)?;

                eprintln!("Press Enter to toggle {} (Ctrl+D to quit)", key);
                let mut pressed = false;
                for line in std::io::stdin().lock().lines() {
                    line.context("reading stdin")?;
                    pressed = !pressed;
                    if pressed {
                        kbd.press_keys(&[code])?;
                    } else {
                        kbd.release_keys(&[code])?;
                    }
                }
                if pressed {
                    kbd.release_keys(&[code])?;
                }
                kbd.destroy();
                Ok(())
            }
            Command::Tap { keys, hold_ms } => {
                let key_codes = keys
                    .iter()
                    .map(|k| codes::key_code(k).ok_or_else(|| anyhow!("unknown key {}", k)))
                    .collect::<anyhow::Result<Vec<u16>>>()?;
                let descriptor = CapabilityDescriptor::new("vhid tap")
                    .with_keys(key_codes.iter().copied())
                    .with_identity(cli.vendor, cli.product);
                let mut dev = create(&descriptor, options)?;

                dev.press_keys(&key_codes)?;
                thread::sleep(Duration::from_millis(hold_ms));
                dev.release_keys(&key_codes)?;
                dev.destroy();
                Ok(())
            }
            Command::Xbox { sweep_ms } => {
                let descriptor = presets::xbox360().with_identity(cli.vendor, cli.product);
                let mut pad = create(&descriptor, options)?;

                let x = evdev::AbsoluteAxisType::ABS_X.0;
                let south = evdev::Key::BTN_SOUTH.code();
                let step_delay = Duration::from_millis(sweep_ms / SWEEP_STEPS as u64);

                for step in 0..=SWEEP_STEPS {
                    pad.emit_axis(x, sweep_value(step))?;
                    pad.sync()?;
                    thread::sleep(step_delay);
                }
                pad.emit_axis(x, 0)?;
                pad.emit_key(south, 1)?;
                pad.sync()?;
                thread::sleep(step_delay);
                pad.emit_key(south, 0)?;
                pad.sync()?;

                pad.destroy();
                Ok(())
            }
        }
    }

    /// Stick position for `step` of an even sweep across the full axis range.
    fn sweep_value(step: i32) -> i32 {
        AXIS_MIN + (AXIS_MAX - AXIS_MIN) * step / SWEEP_STEPS
    }

    fn create(
        descriptor: &CapabilityDescriptor,
        options: DeviceOptions,
    ) -> anyhow::Result<VirtualDevice> {
        let dev = VirtualDevice::initialize(descriptor, options)
            .with_context(|| format!("creating \"{}\"", descriptor.name))?;
        report_node(dev.name());
        Ok(dev)
    }

    fn report_node(name: &str) {
        for attempt in 1..=NODE_LOOKUP_ATTEMPTS {
            match UdevDiscovery::find_by_name(name) {
                Ok(devices) => {
                    for device in devices {
                        info!("event node: {}", device.devnode.display());
                    }
                    return;
                }
                Err(e) if attempt == NODE_LOOKUP_ATTEMPTS => {
                    warn!("could not locate event node: {}", e);
                }
                Err(_) => thread::sleep(NODE_LOOKUP_INTERVAL),
            }
        }
    }

}

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("vhid needs Linux uinput");
    std::process::exit(1);
}
