use std::{env, fs, io::Read};
use zpl_gf::{decode_with, DecodeOptions};
//
// cargo run --example print_field label.zpl
// cat label.zpl | cargo run --example print_field -- --strict
//

fn print_usage() {
    println!("Usage: cargo run --example print_field [--strict] [FILE]");
    println!("Reads one ^GF field from FILE (or stdin) and draws it on the terminal.");
    println!("  --strict   verify the Z64 checksum and the decoded length");
}

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let mut options = DecodeOptions::new().skip_line_breaks(true);
    let mut path = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--strict" => options = options.verify_checksum(true).strict_length(true),
            _ => path = Some(arg),
        }
    }

    let text = match path {
        Some(path) => fs::read_to_string(path).unwrap(),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).unwrap();
            text
        }
    };

    match decode_with(&text, &options) {
        Ok(bitmap) => {
            println!("{} x {} dots", bitmap.width(), bitmap.height());
            for y in 0..bitmap.height() {
                let line: String = (0..bitmap.width())
                    .map(|x| match bitmap.pixel_bit(x, y) {
                        Ok(1) => '#',
                        Ok(_) => '.',
                        Err(_) => '?',
                    })
                    .collect();
                println!("{}", line);
            }
        }
        Err(err) => eprintln!("ERROR {}", err),
    }
}
