//! Simple command that prints one or '-n count' UUIDv7 strings
//!
//! With '-d', each string is parsed back and decoded, and the line also shows the decoded time and
//! the identifier converted anew from that time.

use std::{env, io, io::Write, process::ExitCode};

use uuid7p::{ParseError, Precision, Uuid, V7Generator};

/// Text form to print.
#[derive(Clone, Copy, Debug, Default)]
enum Format {
    #[default]
    Canonical,
    Short,
    Braced,
    Urn,
    Base64,
}

#[derive(Debug, Default)]
struct Options {
    count: Option<usize>,
    precision: Option<Precision>,
    format: Option<Format>,
    decode: bool,
}

fn main() -> io::Result<ExitCode> {
    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count] [-p low|mid|high|default] [-f canonical|short|braced|urn|base64] [-d]",
                    program.as_deref().unwrap_or("uuid7p")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let g = V7Generator::new().with_precision(opts.precision.unwrap_or_default());
    let format = opts.format.unwrap_or_default();

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count.unwrap_or(1) {
        let text = render(&g.generate(), format);
        if !opts.decode {
            writeln!(buf, "{}", text)?;
            continue;
        }

        let line = round_trip(&g, &text, format)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        writeln!(buf, "{}", line)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Parses `text`, decodes its time, and converts the time back into an identifier.
fn round_trip(g: &V7Generator, text: &str, format: Format) -> Result<String, ParseError> {
    let t = g.decode(&Uuid::parse_str(text)?);
    Ok(format!(
        "{}  {}.{:09}  {}",
        text,
        t.unix_secs(),
        t.subsec_nanos(),
        render(&g.convert(&t), format)
    ))
}

fn render(uuid: &Uuid, format: Format) -> String {
    match format {
        Format::Canonical => uuid.encode().to_string(),
        Format::Short => uuid.encode_short().to_string(),
        Format::Braced => uuid.encode_braced().to_string(),
        Format::Urn => uuid.encode_urn().to_string(),
        Format::Base64 => uuid.encode_base64().to_string(),
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        if arg == "-d" {
            if opts.decode {
                return Err("option 'd' given more than once".to_owned());
            }
            opts.decode = true;
            continue;
        }
        let name = match arg.as_str() {
            "-n" => 'n',
            "-p" => 'p',
            "-f" => 'f',
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        };
        let Some(value) = args.next() else {
            return Err(format!("argument to option '{}' missing", name));
        };
        let given_twice = match name {
            'n' => opts.count.replace(parse_count(&value)?).is_some(),
            'p' => opts.precision.replace(parse_precision(&value)?).is_some(),
            _ => opts.format.replace(parse_format(&value)?).is_some(),
        };
        if given_twice {
            return Err(format!("option '{}' given more than once", name));
        }
    }
    Ok(opts)
}

fn parse_count(value: &str) -> Result<usize, String> {
    value
        .parse()
        .map_err(|_| format!("invalid argument to option 'n': '{}'", value))
}

fn parse_precision(value: &str) -> Result<Precision, String> {
    match value {
        "low" => Ok(Precision::Low),
        "mid" => Ok(Precision::Mid),
        "high" => Ok(Precision::High),
        "default" => Ok(Precision::Default),
        _ => Err(format!("invalid argument to option 'p': '{}'", value)),
    }
}

fn parse_format(value: &str) -> Result<Format, String> {
    match value {
        "canonical" => Ok(Format::Canonical),
        "short" => Ok(Format::Short),
        "braced" => Ok(Format::Braced),
        "urn" => Ok(Format::Urn),
        "base64" => Ok(Format::Base64),
        _ => Err(format!("invalid argument to option 'f': '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_args, round_trip, Format};
    use uuid7p::{Precision, V7Generator};

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    /// Parses every option
    #[test]
    fn parses_every_option() {
        let opts = parse_args(args(&["-d", "-n", "3", "-p", "mid", "-f", "urn"])).unwrap();
        assert!(opts.decode);
        assert_eq!(opts.count, Some(3));
        assert_eq!(opts.precision, Some(Precision::Mid));
        assert!(matches!(opts.format, Some(Format::Urn)));

        assert!(!parse_args(args(&[])).unwrap().decode);
        assert!(parse_args(args(&["-d", "-d"])).is_err());
        assert!(parse_args(args(&["-n", "1", "-n", "2"])).is_err());
        assert!(parse_args(args(&["-p", "max"])).is_err());
        assert!(parse_args(args(&["-f"])).is_err());
    }

    /// Decodes and converts back every format
    #[test]
    fn decodes_and_converts_back_every_format() {
        let g = V7Generator::new().with_precision(Precision::High);
        let x = "06592008-007b-71c8-8315-ab123456789a".parse().unwrap();
        for (format, text, renewed) in [
            (
                Format::Canonical,
                "06592008-007b-71c8-8315-ab123456789a",
                "06592008-007b-71c8-8315-00",
            ),
            (Format::Short, "06592008007b71c88315ab123456789a", "06592008007b71c8831500"),
            (Format::Base64, "BlkgCAB7cciDFasSNFZ4mg", "BlkgCAB7cciDFQ"),
        ] {
            assert_eq!(super::render(&x, format), text);
            let line = round_trip(&g, text, format).unwrap();
            let fields: Vec<&str> = line.split("  ").collect();
            assert_eq!(fields[..2], [text, "1704067200.123456789"]);
            assert!(fields[2].starts_with(renewed), "{line}");
        }
        assert!(round_trip(&g, "not a uuid", Format::Canonical).is_err());
    }
}
