use std::error::Error;

use qrgen::{QRBuilder, RenderOptions};

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only data, all other settings are automatically chosen
    let qr = QRBuilder::new(b"Hello, World!").build()?;

    // Convert to image and save
    let img = qr.render(&RenderOptions::default().box_size(4))?; // 4px per module
    img.save("simple_qr.png")?;

    println!("Simple QR code saved to: simple_qr.png");
    Ok(())
}
