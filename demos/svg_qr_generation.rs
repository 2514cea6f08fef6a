use std::error::Error;
use std::fs;

use qrgen::{ECLevel, QRBuilder, RenderOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let vcard = "BEGIN:VCARD\nVERSION:3.0\nN:Doe;Jane\nTEL:+1-555-0100\nEND:VCARD";
    let qr = QRBuilder::new(vcard.as_bytes()).ec_level(ECLevel::Q).build()?;

    // viewBox is in modules, width and height match the PNG pixel size
    let svg = qr.to_svg(&RenderOptions::default())?;
    fs::write("vcard_qr.svg", svg)?;

    println!("SVG QR code saved to: vcard_qr.svg");
    Ok(())
}
