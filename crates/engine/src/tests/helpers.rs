use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use record::Record;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn put(key: &str, value: &str) -> Record {
    Record::Put {
        key: key.as_bytes().to_vec(),
        value: value.as_bytes().to_vec(),
    }
}

pub fn del(key: &str) -> Record {
    Record::Tombstone {
        key: key.as_bytes().to_vec(),
    }
}

/// Writes `records` back-to-back into `dir/name`.
pub fn write_log(dir: &Path, name: &str, records: &[Record]) {
    let file = File::create(dir.join(name)).unwrap();
    let mut w = BufWriter::new(file);
    for rec in records {
        rec.write_to(&mut w).unwrap();
    }
    w.flush().unwrap();
}

/// Decodes every record in `path`, in file order.
pub fn read_records(path: &Path) -> Vec<Record> {
    let mut r = BufReader::new(File::open(path).unwrap());
    let mut recs = Vec::new();
    while let Some(rec) = Record::read_from(&mut r).unwrap() {
        recs.push(rec);
    }
    recs
}

/// Decodes a log into a key -> value map, dropping tombstones.
pub fn read_live(path: &Path) -> HashMap<Vec<u8>, Vec<u8>> {
    read_records(path)
        .into_iter()
        .filter_map(|rec| match rec {
            Record::Put { key, value } => Some((key, value)),
            Record::Tombstone { .. } => None,
        })
        .collect()
}

/// Decodes a hint file into a key -> offset map.
pub fn read_hint(path: &Path) -> HashMap<Vec<u8>, u64> {
    let mut r = BufReader::new(File::open(path).unwrap());
    let mut entries = HashMap::new();
    loop {
        let key_len = match r.read_u32::<BigEndian>() {
            Ok(v) => v,
            Err(_) => break,
        };
        let mut key = vec![0u8; key_len as usize];
        std::io::Read::read_exact(&mut r, &mut key).unwrap();
        let offset = r.read_u64::<BigEndian>().unwrap();
        entries.insert(key, offset);
    }
    entries
}

/// Writes a hint file with the given entries, in order.
pub fn write_hint(dir: &Path, name: &str, entries: &[(&[u8], u64)]) {
    let file = File::create(dir.join(name)).unwrap();
    let mut w = BufWriter::new(file);
    for (key, offset) in entries {
        w.write_u32::<BigEndian>(key.len() as u32).unwrap();
        w.write_all(key).unwrap();
        w.write_u64::<BigEndian>(*offset).unwrap();
    }
    w.flush().unwrap();
}

fn names_with_suffix(dir: &Path, prefix: &str, suffix: &str) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| n.starts_with(prefix) && n.ends_with(suffix))
        .collect();
    names.sort();
    names
}

/// Names of all sealed logs (`data_*.log`), sorted by name.
pub fn data_logs(dir: &Path) -> Vec<String> {
    names_with_suffix(dir, "data_", ".log")
}

/// Names of all hint files (`data_*.hint`), sorted by name.
pub fn hint_files(dir: &Path) -> Vec<String> {
    names_with_suffix(dir, "data_", ".hint")
}
