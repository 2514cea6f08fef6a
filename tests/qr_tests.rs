#[cfg(test)]
mod common {
    use std::collections::HashSet;

    use qrgen::{Color, QR};

    // Decodes PNG bytes with rqrr and returns the version and content of the only symbol
    pub fn decode_png(png: &[u8]) -> (usize, String) {
        let img = image::load_from_memory(png).expect("Invalid PNG").to_luma8();
        let (w, h) = img.dimensions();
        let mut prep = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
            img.get_pixel(x as u32, y as u32).0[0]
        });
        let grids = prep.detect_grids();
        assert_eq!(grids.len(), 1, "Expected exactly one symbol");
        let (meta, content) = grids[0].decode().expect("Failed to read QR");
        (meta.version.0, content)
    }

    pub fn dark_modules(qr: &QR) -> HashSet<(usize, usize)> {
        let w = qr.width();
        (0..w)
            .flat_map(|r| (0..w).map(move |c| (r, c)))
            .filter(|&(r, c)| qr.color(r, c) == Color::Dark)
            .collect()
    }

    // Expands the run-merged path of an SVG back into (row, col) module coordinates
    pub fn svg_dark_modules(svg: &str, border: usize) -> HashSet<(usize, usize)> {
        let d = svg.split("d=\"").nth(1).unwrap().split('"').next().unwrap();
        let mut res = HashSet::new();
        for sub in d.split('M').filter(|s| !s.is_empty()) {
            let (xy, rest) = sub.split_once('h').unwrap();
            let (x, y) = xy.split_once(',').unwrap();
            let len = rest.split_once('v').unwrap().0;
            let (x, y, len) =
                (x.parse::<usize>().unwrap(), y.parse::<usize>().unwrap(), len.parse::<usize>().unwrap());
            for c in x..x + len {
                res.insert((y - border, c - border));
            }
        }
        res
    }
}

#[cfg(test)]
mod qr_proptests {

    use proptest::prelude::*;

    use super::common::decode_png;
    use qrgen::*;

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    proptest! {
        #[test]
        fn proptest_ascii_side_length(data in "[ -~]{0,50}") {
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::L).build().unwrap();
            let ver = qr.version();

            prop_assert_eq!(qr.width(), 4 * *ver + 17);
            prop_assert_eq!(qr.grid().len(), qr.width() * qr.width());
            // Smallest version that fits
            if *ver > 1 {
                let res = QRBuilder::new(data.as_bytes())
                    .ec_level(ECLevel::L)
                    .version(Version::new(*ver - 1))
                    .build();
                prop_assert_eq!(res.unwrap_err(), QRError::DataTooLong);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn proptest_numeric(data in "[0-9]{1,400}", ecl in ec_level_strategy()) {
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
            let png = qr.to_png(&RenderOptions::default().box_size(2)).unwrap();
            let (ver, decoded) = decode_png(&png);

            prop_assert_eq!(ver, *qr.version());
            prop_assert_eq!(data, decoded);
        }

        #[test]
        fn proptest_alphanumeric(data in r"[0-9A-Z $%*+\-./:]{1,300}", ecl in ec_level_strategy()) {
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
            let png = qr.to_png(&RenderOptions::default().box_size(2)).unwrap();

            prop_assert_eq!(data, decode_png(&png).1);
        }

        #[test]
        fn proptest_unicode(data in r"\PC{1,100}", ecl in ec_level_strategy()) {
            let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
            let png = qr.to_png(&RenderOptions::default().box_size(2)).unwrap();

            prop_assert_eq!(data, decode_png(&png).1);
        }
    }
}

#[cfg(test)]
mod qr_tests {
    use rayon::prelude::*;
    use test_case::test_case;

    use super::common::{dark_modules, decode_png, svg_dark_modules};
    use qrgen::{Color, ECLevel, MaskPattern, QRBuilder, QRError, RenderOptions, Version};

    #[test_case("Hello, world!🌎".to_string(), ECLevel::L; "test_qr_1")]
    #[test_case("TEST".to_string(), ECLevel::M; "test_qr_2")]
    #[test_case("12345".to_string(), ECLevel::Q; "test_qr_3")]
    #[test_case("OK".to_string(), ECLevel::H; "test_qr_4")]
    #[test_case("https://example.com/path?query=1&x=ÄÖÜ".to_string(), ECLevel::M; "test_qr_5")]
    #[test_case("BEGIN:VCARD\nVERSION:3.0\nN:Doe;John\nTEL:+1-555-0100\nEND:VCARD".to_string(), ECLevel::Q; "test_qr_6")]
    #[test_case("A11111111111111".repeat(20), ECLevel::M; "test_qr_7")]
    #[test_case("1234567890".repeat(100), ECLevel::H; "test_qr_8")]
    #[test_case("B3@j🎮#Z%8v🍣K!🔐3zC^8📖&r💾F9*🔐b6🌼".repeat(10), ECLevel::L; "test_qr_9")]
    fn test_qr_round_trip(data: String, ecl: ECLevel) {
        let qr = QRBuilder::new(data.as_bytes()).ec_level(ecl).build().unwrap();
        let png = qr.to_png(&RenderOptions::default().box_size(3)).unwrap();

        let (ver, decoded) = decode_png(&png);
        assert_eq!(ver, *qr.version());
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_hello_world() {
        let qr = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::M).build().unwrap();
        assert_eq!(qr.version(), Version::new(1));
        assert_eq!(qr.ec_level(), ECLevel::M);
        assert_eq!(qr.mask(), Some(MaskPattern::new(0)));
        assert_eq!(qr.width(), 21);

        let png = qr.to_png(&RenderOptions::default()).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (290, 290));
        assert_eq!(decode_png(&png), (1, "HELLO WORLD".to_string()));
    }

    #[test]
    fn test_empty_input() {
        let qr = QRBuilder::new(b"").build().unwrap();
        assert_eq!(qr.version(), Version::new(1));

        let png = qr.to_png(&RenderOptions::default()).unwrap();
        assert_eq!(decode_png(&png), (1, String::new()));
    }

    #[test]
    fn test_capacity_limits() {
        let qr = QRBuilder::new("9".repeat(7089).as_bytes()).ec_level(ECLevel::L).build().unwrap();
        assert_eq!(qr.version(), Version::new(40));

        let res = QRBuilder::new("9".repeat(7090).as_bytes()).ec_level(ECLevel::L).build();
        assert_eq!(res.unwrap_err(), QRError::DataTooLong);
        let res = QRBuilder::new(&[0xA5; 2954]).ec_level(ECLevel::L).build();
        assert_eq!(res.unwrap_err(), QRError::DataTooLong);
    }

    #[test]
    fn test_kanji() {
        let data = "漢字テキスト漢字テキスト漢字テキスト";
        let with_kanji = QRBuilder::new(data.as_bytes()).kanji(true).build().unwrap();
        let without_kanji = QRBuilder::new(data.as_bytes()).build().unwrap();
        assert!(with_kanji.version() < without_kanji.version());
    }

    #[test]
    fn test_idempotence() {
        let opts = RenderOptions::default().box_size(4).border(2);
        let build = || QRBuilder::new(b"Deterministic output").ec_level(ECLevel::Q).build().unwrap();

        let (a, b) = (build(), build());
        assert_eq!(a, b);
        assert_eq!(a.to_png(&opts).unwrap(), b.to_png(&opts).unwrap());
        assert_eq!(a.to_svg(&opts).unwrap(), b.to_svg(&opts).unwrap());
    }

    #[test]
    fn test_parallel_determinism() {
        let inputs = (0..64).map(|i| format!("Parallel payload #{i}").repeat(i % 7 + 1)).collect::<Vec<_>>();
        let opts = RenderOptions::default().box_size(2);
        let render = |s: &String| {
            QRBuilder::new(s.as_bytes()).build().and_then(|qr| qr.to_png(&opts)).unwrap()
        };

        let sequential = inputs.iter().map(render).collect::<Vec<_>>();
        let parallel = inputs.par_iter().map(render).collect::<Vec<_>>();
        assert_eq!(sequential, parallel);
    }

    #[test_case(1, 0)]
    #[test_case(3, 2)]
    #[test_case(10, 4)]
    fn test_png_svg_equivalence(box_size: u32, border: u32) {
        let qr = QRBuilder::new("Same symbol in every format".as_bytes()).build().unwrap();
        let opts = RenderOptions::default().box_size(box_size).border(border);
        let side = (qr.width() as u32 + 2 * border) * box_size;

        let svg = qr.to_svg(&opts).unwrap();
        assert!(svg.contains(&format!("width=\"{side}\" height=\"{side}\"")));
        let expected = dark_modules(&qr);
        assert_eq!(svg_dark_modules(&svg, border as usize), expected);

        let png = qr.to_png(&opts).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (side, side));
        let w = qr.width();
        for r in 0..w {
            for c in 0..w {
                let x = (border + c as u32) * box_size + box_size / 2;
                let y = (border + r as u32) * box_size + box_size / 2;
                let exp = if expected.contains(&(r, c)) { Color::Dark } else { Color::Light };
                assert_eq!(img.get_pixel(x, y).0[0] == 0, exp == Color::Dark, "Module ({r}, {c})");
            }
        }
    }

    #[test]
    fn test_invalid_box_size() {
        let qr = QRBuilder::new(b"box").build().unwrap();
        let opts = RenderOptions::default().box_size(0);
        assert_eq!(qr.to_png(&opts).unwrap_err(), QRError::InvalidBoxSize);
        assert_eq!(qr.to_svg(&opts).unwrap_err(), QRError::InvalidBoxSize);
    }
}

#[cfg(test)]
mod cli_tests {
    use std::fs;
    use std::process::Command;

    use super::common::decode_png;

    fn qrgen() -> Command {
        Command::new(env!("CARGO_BIN_EXE_qrgen"))
    }

    #[test]
    fn test_cli_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/dir/code.png");
        let res = qrgen().args(["-t", "hello from the cli", "-o"]).arg(&out).output().unwrap();

        assert!(res.status.success());
        let stdout = String::from_utf8(res.stdout).unwrap();
        assert_eq!(stdout.trim(), format!("Saved PNG QR code to: {}", out.display()));
        let png = fs::read(&out).unwrap();
        assert_eq!(decode_png(&png).1, "hello from the cli");
    }

    #[test]
    fn test_cli_svg_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let inp = dir.path().join("input.txt");
        fs::write(&inp, "text from a file").unwrap();
        let out = dir.path().join("code.svg");
        let res = qrgen()
            .arg("--file")
            .arg(&inp)
            .arg("--output")
            .arg(&out)
            .args(["--error", "h", "--box-size", "3", "--border", "1"])
            .output()
            .unwrap();

        assert!(res.status.success());
        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(String::from_utf8(res.stdout).unwrap().starts_with("Saved SVG QR code to:"));
    }

    #[test]
    fn test_cli_format_inference() {
        let dir = tempfile::tempdir().unwrap();

        // No suffix gets .png appended
        let res = qrgen().args(["-t", "x", "-o"]).arg(dir.path().join("plain")).output().unwrap();
        assert!(res.status.success());
        assert!(dir.path().join("plain.png").exists());

        // Unknown suffix is kept and written as PNG
        let out = dir.path().join("code.img");
        let res = qrgen().args(["-t", "x", "-o"]).arg(&out).output().unwrap();
        assert!(res.status.success());
        assert_eq!(&fs::read(&out).unwrap()[..4], b"\x89PNG");

        // Forced format wins over the suffix
        let out = dir.path().join("forced.png");
        let res = qrgen().args(["-t", "x", "--format", "svg", "-o"]).arg(&out).output().unwrap();
        assert!(res.status.success());
        assert!(fs::read_to_string(&out).unwrap().contains("<svg"));
    }

    #[test]
    fn test_cli_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let inp = dir.path().join("missing.txt");
        let res = qrgen().arg("-f").arg(&inp).arg("-o").arg(dir.path().join("out.png")).output().unwrap();

        assert_eq!(res.status.code(), Some(1));
        let stdout = String::from_utf8(res.stdout).unwrap();
        assert_eq!(stdout.trim(), format!("Input file not found: {}", inp.display()));
        assert!(!dir.path().join("out.png").exists());
    }

    #[test]
    fn test_cli_oversized_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("huge.png");
        let res = qrgen().args(["-t", "x", "--box-size", "100000", "-o"]).arg(&out).output().unwrap();

        assert_eq!(res.status.code(), Some(1));
        assert!(String::from_utf8(res.stderr).unwrap().contains("Failed to render QR code"));
        assert!(!out.exists());
    }

    #[test]
    fn test_cli_data_too_long() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let args = ["--qr-version", "1", "--error", "H", "-o"];

        let res = qrgen().args(["-t", "fits"]).args(args).arg(&out).output().unwrap();
        assert!(res.status.success());

        let res = qrgen().args(["-t", "does not fit"]).args(args).arg(&out).output().unwrap();
        assert!(!res.status.success());
        assert!(String::from_utf8(res.stderr).unwrap().contains("Data too long"));
    }
}
