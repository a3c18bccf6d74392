
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use assembler::error::AssemblerError;
use assembler::Emitted;

const SOURCE_EXTENSION: &str = "asm";
const OUTPUT_EXTENSION: &str = "hack";

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tListing: {}\n\tOutfile: {}\n\tInfile: {}",
        verbosity_filter(args.occurrences_of("verbose")),
        args.is_present("print-debug"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap_or("None")
    );

    if let Err(err) = run(&args) {
        error!("fatal: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &ArgMatches) -> Result<(), AssemblerError> {
    let ipath = Path::new(args.value_of("INPUT").unwrap_or(""));
    let opath = match args.value_of("output") {
        Some(filename) => PathBuf::from(filename),
        None => output_path(ipath),
    };

    let emitted = assemble_file(ipath, &opath)?;
    if args.is_present("print-debug") {
        print_listing(&emitted);
    }
    Ok(())
}

/// Assembles `ipath` into `opath`. The output file is only created or
/// truncated once assembly has fully succeeded.
fn assemble_file(ipath: &Path, opath: &Path) -> Result<Vec<Emitted>, AssemblerError> {
    check_extension(ipath)?;
    let ifile = File::open(ipath).map_err(|err| file_error(ipath, err))?;

    let mut buffer: Vec<u8> = Vec::new();
    let emitted = assembler::assemble(Box::new(ifile), &mut buffer)?;

    fs::write(opath, &buffer).map_err(|err| file_error(opath, err))?;
    info!("Wrote {} instruction(s) to `{}`.", emitted.len(), opath.display());
    Ok(emitted)
}

fn check_extension(path: &Path) -> Result<(), AssemblerError> {
    match path.extension() {
        Some(ext) if ext == SOURCE_EXTENSION => Ok(()),
        _ => Err(AssemblerError::File {
            path: path.display().to_string(),
            message: format!("input file must have a .{} extension", SOURCE_EXTENSION),
        }),
    }
}

/// `dir/Prog.asm` becomes `dir/Prog.hack`.
fn output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

fn file_error(path: &Path, err: std::io::Error) -> AssemblerError {
    AssemblerError::File { path: path.display().to_string(), message: err.to_string() }
}

fn print_listing(emitted: &[Emitted]) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for ins in emitted.iter() {
        grid.add(Cell::from(format!("{:5}:", ins.address)));
        grid.add(Cell::from(format!("{}", ins.instruction)));
        grid.add(Cell::from("=>".to_string()));
        grid.add(Cell::from(format!("{}", ins.word)));
    }

    println!("{}", grid.fit_into_columns(4));
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the .asm input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to this file instead of <INPUT>.hack"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .takes_value(false)
            .help("prints a listing of each instruction and its encoding to STDOUT"))
        .get_matches()
}

fn verbosity_filter(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(verbosity_filter(verbosity))
        .chain(std::io::stderr())
        .apply().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_extension() {
        assert!(check_extension(Path::new("Add.asm")).is_ok());
        assert!(check_extension(Path::new("dir/sub/Pong.asm")).is_ok());

        assert!(check_extension(Path::new("Add")).is_err());
        assert!(check_extension(Path::new("Add.hack")).is_err());
        assert!(check_extension(Path::new("Add.ASM")).is_err());
        assert!(check_extension(Path::new("asm")).is_err());
        assert!(check_extension(Path::new("")).is_err());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("Add.asm")), PathBuf::from("Add.hack"));
        assert_eq!(output_path(Path::new("dir/Max.asm")), PathBuf::from("dir/Max.hack"));
        assert_eq!(output_path(Path::new("a.b.asm")), PathBuf::from("a.b.hack"));
    }

    #[test]
    fn test_verbosity_filter() {
        assert_eq!(verbosity_filter(0), log::LevelFilter::Error);
        assert_eq!(verbosity_filter(2), log::LevelFilter::Info);
        assert_eq!(verbosity_filter(7), log::LevelFilter::Debug);
    }

    /// A scratch directory unique to one test, removed on drop.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("hackasm-{}-{}", name, std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            Scratch(dir)
        }

        fn file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.0.join(name);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            fs::remove_dir_all(&self.0).ok();
        }
    }

    #[test]
    fn test_assemble_file_writes_output() {
        let dir = Scratch::new("ok");
        let src = dir.file("Add.asm", "@2\nD=A\n@3\nD=D+A\n@0\nM=D\n");
        let out = dir.file("Add.hack", "stale contents\n");

        let emitted = assemble_file(&src, &out).unwrap();
        assert_eq!(emitted.len(), 6);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "0000000000000010\n\
             1110110000010000\n\
             0000000000000011\n\
             1110000010010000\n\
             0000000000000000\n\
             1110001100001000\n"
        );
    }

    #[test]
    fn test_failed_assembly_keeps_existing_output() {
        let dir = Scratch::new("bad-mnemonic");
        let src = dir.file("Bad.asm", "@1\nD=X\n");
        let out = dir.file("Bad.hack", "previous build\n");

        match assemble_file(&src, &out) {
            Err(AssemblerError::InvalidMnemonic { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected an invalid mnemonic, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous build\n");
    }

    #[test]
    fn test_failed_assembly_creates_no_output() {
        let dir = Scratch::new("no-output");
        let src = dir.file("Loop.asm", "(LOOP)\n@LOOP\nnonsense\n");
        let out = dir.0.join("Loop.hack");

        assert!(assemble_file(&src, &out).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_assemble_file_rejects_extension() {
        let dir = Scratch::new("extension");
        let src = dir.file("Add.txt", "@1\n");
        let out = dir.file("Add.hack", "untouched\n");

        match assemble_file(&src, &out) {
            Err(AssemblerError::File { path, .. }) => assert!(path.ends_with("Add.txt")),
            other => panic!("expected a file error, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&out).unwrap(), "untouched\n");
    }

    #[test]
    fn test_assemble_file_missing_input() {
        let dir = Scratch::new("missing");
        let out = dir.0.join("Gone.hack");

        match assemble_file(&dir.0.join("Gone.asm"), &out) {
            Err(AssemblerError::File { path, .. }) => assert!(path.ends_with("Gone.asm")),
            other => panic!("expected a file error, got {:?}", other),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_file_error_names_path() {
        let err = file_error(Path::new("missing.asm"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"));
        assert_eq!(err.to_string(), "file error: `missing.asm`: not found");
    }
}
