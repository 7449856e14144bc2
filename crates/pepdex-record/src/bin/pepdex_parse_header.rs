use std::{env, fs, path::Path};

use pepdex_record::parse_record;

fn main() {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: pepdex_parse_header <pep-NNNN.rst>");
        std::process::exit(2);
    };
    if args.next().is_some() {
        eprintln!("usage: pepdex_parse_header <pep-NNNN.rst>");
        std::process::exit(2);
    }

    let text = match fs::read_to_string(&path) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("failed to read `{path}`: {err}");
            std::process::exit(2);
        }
    };

    let document = Path::new(&path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.clone());

    match parse_record(&text, &document) {
        Ok(record) => {
            println!(
                "ok: number={} status={} type={} authors={} extra={}",
                record.number(),
                record.status,
                record.proposal_type,
                record.author.len(),
                record.extra.len()
            );
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
