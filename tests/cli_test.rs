use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::{PathBuf,Path};
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

// Write some text with plenty of repeats, mixed with lines that do not repeat.
fn make_input(temp_dir: &tempfile::TempDir,name: &str,len: usize) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let mut txt: Vec<u8> = Vec::new();
    let mut line = 0;
    while txt.len() < len {
        match line % 3 {
            0 => txt.extend_from_slice(b"To be, or not to be, that is the question:\r\n"),
            1 => txt.extend_from_slice(format!("line {} of the test file\r\n",line*line).as_bytes()),
            _ => txt.extend_from_slice(b"Whether 'tis nobler in the mind to suffer\r\n")
        }
        line += 1;
    }
    txt.truncate(len);
    let path = temp_dir.path().join(name);
    std::fs::write(&path,txt)?;
    Ok(path)
}

fn run(subcommand: &str,method: &str,in_path: &Path,out_path: &Path,extra: &[&str]) -> STDRESULT {
    let mut cmd = Command::cargo_bin("lzpipe")?;
    cmd.arg(subcommand)
        .arg("-m").arg(method)
        .arg("-i").arg(in_path)
        .arg("-o").arg(out_path)
        .args(extra)
        .assert()
        .success();
    Ok(())
}

fn round_trip_test(method: &str,len: usize,extra: &[&str]) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"original.txt",len)?;
    let cmp_path = temp_dir.path().join("compressed.bin");
    let out_path = temp_dir.path().join("expanded.txt");
    run("compress",method,&in_path,&cmp_path,extra)?;
    run("expand",method,&cmp_path,&out_path,extra)?;
    match (std::fs::read(in_path),std::fs::read(cmp_path),std::fs::read(out_path)) {
        (Ok(v1),Ok(c),Ok(v2)) => {
            assert!(c.len() < v1.len());
            assert_eq!(v1,v2);
        },
        _ => panic!("unable to compare output with reference")
    }
    Ok(())
}

#[test]
fn lzss_huff_round_trip() -> STDRESULT {
    round_trip_test("lzss_huff",20000,&[])?;
    round_trip_test("lzss_huff",150000,&["-t","3"])
}

#[test]
fn lzss_huff_small_chunks() -> STDRESULT {
    round_trip_test("lzss_huff",30000,&["--chunk-size","2000","-t","5"])?;
    round_trip_test("lzss_huff",30000,&["--chunk-size","2000","--naive"])
}

#[test]
fn single_stage_round_trips() -> STDRESULT {
    round_trip_test("lzss",10000,&[])?;
    round_trip_test("lz77",10000,&["--naive"])?;
    round_trip_test("huffman",10000,&[])
}

#[test]
fn empty_input_is_rejected() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("empty.txt");
    std::fs::write(&in_path,b"")?;
    let mut cmd = Command::cargo_bin("lzpipe")?;
    cmd.arg("compress")
        .arg("-m").arg("lzss_huff")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(temp_dir.path().join("out.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is empty"));
    Ok(())
}

#[test]
fn unknown_method() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"original.txt",100)?;
    let mut cmd = Command::cargo_bin("lzpipe")?;
    cmd.arg("compress")
        .arg("-m").arg("lzw")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(temp_dir.path().join("out.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
    Ok(())
}

#[test]
fn corrupt_input_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"original.txt",100)?;
    let mut cmd = Command::cargo_bin("lzpipe")?;
    cmd.arg("expand")
        .arg("-m").arg("lzss_huff")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(temp_dir.path().join("out.txt"))
        .assert()
        .failure();
    Ok(())
}
