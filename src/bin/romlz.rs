use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use romlz::{
    decompress, CharTable, EncodeConfig, Encoder, PointerTable, RomImage, Script, ScriptConfig,
};

#[derive(Parser, Debug)]
#[command(name = "romlz")]
#[command(about = "Extract and reinsert LZ-compressed script text in ROM images")]
#[command(version)]
struct Args {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decompress a script from the ROM into an editable dump
    Decompress {
        /// ROM image to read
        #[arg(short, long)]
        rom: PathBuf,

        /// Offset of the compressed script (hex)
        #[arg(long, value_parser = parse_hex)]
        offset: usize,

        /// Dump file to write
        #[arg(short, long)]
        out: PathBuf,

        /// Character table (.tbl)
        #[arg(short, long)]
        table: PathBuf,

        /// Byte that ends each script line (hex)
        #[arg(long, value_parser = parse_hex_u8, default_value = "00")]
        breaker: u8,
    },

    /// Compress an edited dump and write it and its pointer tables into the ROM
    Compress {
        /// Edited dump file
        #[arg(short, long)]
        script: PathBuf,

        /// ROM image to update
        #[arg(short, long)]
        rom: PathBuf,

        /// Offset of the script region (hex)
        #[arg(long, value_parser = parse_hex)]
        offset: usize,

        /// Size of the script region in bytes (hex)
        #[arg(long, value_parser = parse_hex)]
        size: usize,

        /// Offset of the low-byte pointer array (hex)
        #[arg(long, value_parser = parse_hex)]
        ptr_lo: usize,

        /// Offset of the high-byte pointer array (hex)
        #[arg(long, value_parser = parse_hex)]
        ptr_hi: usize,

        /// Entries available in each pointer array (hex)
        #[arg(long, value_parser = parse_hex)]
        ptr_size: usize,

        /// Character table (.tbl)
        #[arg(short, long)]
        table: PathBuf,

        /// Address of the first script line (hex)
        #[arg(long, value_parser = parse_hex_u16, default_value = "6900")]
        base: u16,

        /// Try every operand width instead of the usual 10-11 / 3-5 sweep
        #[arg(long)]
        full_sweep: bool,

        /// Write the patched ROM here instead of in place
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

const EXIT_OK: u8 = 0;
const EXIT_ERROR: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "romlz=debug" } else { "romlz=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Decompress { rom, offset, out, table, breaker } => {
            let table = CharTable::load(&table)?;
            let rom = RomImage::open(&rom)?;
            let result = decompress(rom.as_bytes(), offset)?;

            let config = ScriptConfig { line_breaker: breaker, ..Default::default() };
            let script = Script::split(&result.data, config.line_breaker);
            script.write_dump(&out, &table)?;

            let ratio = if result.compressed_size == 0 {
                0.0
            } else {
                result.data.len() as f64 / result.compressed_size as f64
            };
            println!(
                "Decompressed text: {} bytes from {} compressed ({} lines), ratio: {:.3}",
                result.data.len(),
                result.compressed_size,
                script.len(),
                ratio
            );
            println!("Text extracted to {}", out.display());
            Ok(())
        }
        Command::Compress {
            script,
            rom: rom_path,
            offset,
            size,
            ptr_lo,
            ptr_hi,
            ptr_size,
            table,
            base,
            full_sweep,
            output,
        } => {
            let table = CharTable::load(&table)?;
            let script = Script::read_dump(&script, &table)?;
            let config = ScriptConfig { pointer_base: base, ..Default::default() };

            let pointers = PointerTable::from_lines(script.lines(), config.pointer_base);

            let sweep = if full_sweep { EncodeConfig::full_sweep() } else { EncodeConfig::default() };
            let encode_config = EncodeConfig { max_size: Some(size), ..sweep };
            let compressed = Encoder::new(encode_config).compress(&script.to_bytes())?;
            pointers.check_capacity(ptr_size)?;

            // Both capacity checks passed: only now touch the image
            let mut rom = RomImage::open(&rom_path)?;
            let script_free = rom.write_region(offset, size, &compressed.data)?;
            let ptr_free = rom.write_region(ptr_lo, ptr_size, &pointers.low_bytes())?;
            rom.write_region(ptr_hi, ptr_size, &pointers.high_bytes())?;
            rom.save(output.as_ref().unwrap_or(&rom_path))?;

            tracing::info!(
                source_width = compressed.header.source_width,
                length_width = compressed.header.length_width,
                "selected header"
            );
            println!(
                "Script text written to 0x{:X}, ratio: {:.3}, {} bytes free.",
                offset,
                compressed.ratio(),
                script_free
            );
            println!(
                "Pointer table written to 0x{:X} and 0x{:X}, {} entries free.",
                ptr_lo, ptr_hi, ptr_free
            );
            Ok(())
        }
    }
}

fn parse_hex(s: &str) -> Result<usize, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    usize::from_str_radix(digits, 16).map_err(|e| format!("invalid hex value {:?}: {}", s, e))
}

fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let value = parse_hex(s)?;
    u8::try_from(value).map_err(|_| format!("{} does not fit in a byte", s))
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let value = parse_hex(s)?;
    u16::try_from(value).map_err(|_| format!("{} does not fit in 16 bits", s))
}
