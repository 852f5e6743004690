use clap::{arg,crate_version,value_parser,ArgMatches,Command};
use lzpipe::{huffman,lz77,lzss,lzss_huff,matchers::MatcherKind};
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const RCH: &str = "unreachable was reached";
const ENCODE_THREADS: usize = 8;
const DECODE_THREADS: usize = 4;

fn ok_to_overwrite(path_out: &str) -> bool {
    if let Ok(_f) = std::fs::File::open(path_out) {
        let mut ans = String::new();
        eprint!("{} exists, overwrite? (y/n) ",path_out);
        std::io::stdin().read_line(&mut ans).expect("could not read stdin");
        if ans.trim_end()=="y" || ans.trim_end()=="Y" {
            log::warn!("existing file will not be truncated");
            return true;
        }
        return false;
    }
    true
}

fn add_args(cmd: Command,methods: [&'static str;4]) -> Command {
    cmd.arg(arg!(-m --method <METHOD> "compression algorithm").value_parser(methods)
            .required(true))
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .arg(arg!(-t --threads <N> "maximum number of chunks worked on at once").value_parser(value_parser!(usize))
            .required(false))
        .arg(arg!(--"chunk-size" <BYTES> "bytes per chunk when compressing").value_parser(value_parser!(usize))
            .required(false))
        .arg(arg!(--naive "search the dictionary by brute force"))
}

fn options(cmd: &ArgMatches,default_threads: usize) -> lzpipe::Options {
    let mut opt = lzpipe::STD_OPTIONS.clone();
    opt.threads = *cmd.get_one::<usize>("threads").unwrap_or(&default_threads);
    if let Some(chunk_size) = cmd.get_one::<usize>("chunk-size") {
        opt.chunk_size = *chunk_size;
    }
    if cmd.get_flag("naive") {
        opt.matcher = MatcherKind::Naive;
    }
    opt
}

/// returns (input path, output path, method) if the operation should go ahead
fn paths(cmd: &ArgMatches) -> Result<Option<(String,String,String)>,Box<dyn std::error::Error>> {
    let path_in = cmd.get_one::<String>("input").expect(RCH);
    let path_out = cmd.get_one::<String>("output").expect(RCH);
    let method = cmd.get_one::<String>("method").expect(RCH);
    if std::fs::metadata(path_in)?.len() == 0 {
        eprintln!("{} is empty",path_in);
        return Err(Box::new(lzpipe::Error::UnexpectedEnd));
    }
    if !ok_to_overwrite(path_out) {
        eprintln!("abort operation");
        return Ok(None);
    }
    Ok(Some((path_in.to_string(),path_out.to_string(),method.to_string())))
}

fn main() -> STDRESULT
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"Examples:
---------
Compress:      `lzpipe compress -m lzss_huff -i my_expanded -o my_compressed`
Expand:        `lzpipe expand -m lzss_huff -i my_compressed -o my_expanded`
More threads:  `lzpipe compress -m lzss_huff -t 16 -i my_expanded -o my_compressed`";

    let methods = ["lzss_huff","lzss","lz77","huffman"];

    let mut main_cmd = Command::new("lzpipe")
        .about("Compress and expand with LZSS and canonical Huffman codes")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(add_args(Command::new("compress"),methods)
        .about("compress a file"));
    main_cmd = main_cmd.subcommand(add_args(Command::new("expand"),methods)
        .about("expand a file"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let (path_in,path_out,method) = match paths(cmd)? {
            Some(p) => p,
            None => return Ok(())
        };
        let opt = options(cmd,ENCODE_THREADS);
        let mut out_file = std::fs::OpenOptions::new().write(true).truncate(false).create(true).open(&path_out)?;
        let (in_size,out_size) = match method.as_str() {
            "lzss_huff" => {
                let mut in_file = std::fs::File::open(&path_in)?;
                lzss_huff::compress(&mut in_file,&mut out_file,&opt)?
            },
            "lzss" | "lz77" | "huffman" => {
                let ibuf = std::fs::read(&path_in)?;
                let obuf = match method.as_str() {
                    "lzss" => lzss::encode(&ibuf,&opt.lzss,opt.matcher)?,
                    "lz77" => lz77::encode(&ibuf,&lz77::STD_OPTIONS,opt.matcher)?,
                    _ => huffman::encode(&ibuf)?
                };
                std::io::Write::write_all(&mut out_file,&obuf)?;
                (ibuf.len() as u64,obuf.len() as u64)
            },
            _ => {
                eprintln!("{} not supported",method);
                return Err(Box::new(std::fmt::Error));
            }
        };
        out_file.set_len(out_size)?;
        eprintln!("compressed {} into {}",in_size,out_size);
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let (path_in,path_out,method) = match paths(cmd)? {
            Some(p) => p,
            None => return Ok(())
        };
        let opt = options(cmd,DECODE_THREADS);
        let mut out_file = std::fs::OpenOptions::new().write(true).truncate(false).create(true).open(&path_out)?;
        let (in_size,out_size) = match method.as_str() {
            "lzss_huff" => {
                let mut in_file = std::fs::File::open(&path_in)?;
                lzss_huff::expand(&mut in_file,&mut out_file,&opt)?
            },
            "lzss" | "lz77" | "huffman" => {
                let ibuf = std::fs::read(&path_in)?;
                let obuf: Vec<u8> = match method.as_str() {
                    "lzss" => lzss::decode(&ibuf,&opt.lzss)?,
                    "lz77" => lz77::decode(&ibuf,&lz77::STD_OPTIONS)?,
                    _ => huffman::decode(&ibuf)?
                };
                std::io::Write::write_all(&mut out_file,&obuf)?;
                (ibuf.len() as u64,obuf.len() as u64)
            },
            _ => {
                eprintln!("{} not supported",method);
                return Err(Box::new(std::fmt::Error));
            }
        };
        out_file.set_len(out_size)?;
        eprintln!("expanded {} into {}",in_size,out_size);
    }

    Ok(())
}
