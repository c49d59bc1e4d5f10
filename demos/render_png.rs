use std::{env, fs};
use zpl_gf::{decode_with, DecodeOptions};
//
// cargo run --example render_png label.zpl label.png
//

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        println!("usage: render_png <field-file> <png-file>");
        return;
    }

    let text = fs::read_to_string(&args[1]).unwrap();
    let options = DecodeOptions::new().skip_line_breaks(true);

    let bitmap = match decode_with(&text, &options) {
        Ok(bitmap) => bitmap,
        Err(err) => panic!("Invalid graphic field: {}", err),
    };

    let img = image::GrayImage::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
        match bitmap.is_black(x as usize, y as usize) {
            Ok(true) => image::Luma([0u8]),
            _ => image::Luma([255u8]),
        }
    });
    img.save(&args[2]).unwrap();

    println!("wrote {} ({}x{})", args[2], bitmap.width(), bitmap.height());
}
