use std::fs::File;
use std::io::{self, prelude::*};
use std::path::Path;

use crate::errors::LoadErr;

pub(crate) fn read_file<P: AsRef<Path>>(path: P) -> Result<String, LoadErr> {
    let path = path.as_ref();
    let read = || -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    };
    read().map_err(|err| LoadErr::io(path, err))
}

/// Creates or truncates the file.
pub(crate) fn write_file<P: AsRef<Path>>(path: P, text: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
