use std::error::Error;

use qrgen::{parse_color, ECLevel, MaskPattern, QRBuilder, RenderOptions, Version};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "This example shows all available configuration options for QR code generation.";

    let qr = QRBuilder::new(data.as_bytes())
        .version(Version::new(9))   // QR version (size) - if not provided, finds smallest version to fit data
        .ec_level(ECLevel::H)       // Error correction level - if not provided, defaults to ECLevel::M
        .kanji(false)               // Kanji mode - if not provided, defaults to false
        .mask(MaskPattern::new(2))  // Mask pattern - if not provided, finds best mask based on penalty score
        .build()?;

    let opts = RenderOptions::default()
        .box_size(6)                            // Pixels per module - defaults to 10
        .border(2)                              // Quiet zone in modules - defaults to 4
        .fill(parse_color("#264653")?)          // Dark modules - defaults to black
        .background(parse_color("#f1faee")?);   // Light modules - defaults to white

    let img = qr.render(&opts)?;
    img.save("configured_qr.png")?;

    println!("Configured QR code saved to: configured_qr.png");
    println!("QR metadata: {}", qr.metadata());
    println!("{}", qr.to_str(1));

    Ok(())
}
