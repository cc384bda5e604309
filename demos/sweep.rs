//! Connects to an AD51xx through an XR2280x bridge and sweeps channel 0.
//!
//! Usage: `cargo run --example sweep --features hid -- [ADDRESS] [PART]`
//! e.g. `cargo run --example sweep --features hid -- 0x2C AD5144A`

use ad51xx_digipot::{Ad51xx, Result, Variant, Xr2280xBridge};
use hidapi::HidApi;
use std::{env, thread, time::Duration};

fn parse_address(arg: &str) -> Option<u8> {
    let digits = arg.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).ok()
}

fn main() -> Result<()> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let address = args
        .next()
        .and_then(|a| parse_address(&a))
        .unwrap_or(0x2C);
    let variant = args
        .next()
        .and_then(|name| Variant::by_name(&name))
        .unwrap_or(Variant::AD5144A);

    let hid_api = HidApi::new().map_err(ad51xx_digipot::TransportError::from)?;
    let bridge = match Xr2280xBridge::open_first(&hid_api) {
        Ok(bridge) => bridge,
        Err(e) => {
            eprintln!("Error opening XR2280x bridge: {}", e);
            eprintln!(
                "Ensure device is connected and permissions are set (e.g., udev rules on Linux)."
            );
            return Err(e.into());
        }
    };
    bridge.set_speed_khz(100)?;

    let mut pot = Ad51xx::new(bridge, address, variant)?;
    println!("Connecting to {} at 0x{:02X}...", variant, address);
    if let Err(e) = pot.begin() {
        eprintln!("Device not found. Check wiring and address.");
        return Err(e);
    }
    println!("Connected!");
    println!("Channel count: {}", pot.channel_count());
    println!("Max value: {}", pot.max_value());

    println!("Sweeping channel 0 from 0 to max...");
    for value in (0..=pot.max_value()).step_by(16) {
        pot.write(0, value)?;
        println!("Wrote {}", value);
        thread::sleep(Duration::from_millis(50));
    }

    println!("Setting all channels to mid-scale...");
    pot.mid_scale_all()?;
    thread::sleep(Duration::from_millis(500));

    println!("Setting all channels to max...");
    pot.max_scale_all()?;
    thread::sleep(Duration::from_millis(500));

    println!("Zeroing all channels...");
    pot.zero_all()?;

    println!("Channel 0 cached value: {}", pot.read(0)?);
    println!("Channel 0 RDAC read-back: {}", pot.read_back_rdac(0)?);
    Ok(())
}
