use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;

/// Writes `value` as pretty-printed JSON to `path`, replacing any existing file.
pub fn save_json_file<T, P>(file_kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file: {}", file_kind, path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {} JSON to {}", file_kind, path.display()))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush {} file: {}", file_kind, path.display()))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn test_json_file_roundtrip() {
        let dir = env::temp_dir().join(format!("flapnet-util-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("values.json");

        save_json_file("test", &path, &vec![1, 2, 3]).unwrap();
        let values: Vec<u32> = read_json_file("test", &path).unwrap();
        assert_eq!(values, [1, 2, 3]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_mentions_kind_and_path() {
        let err = read_json_file::<u32, _>("model", "/nonexistent/flapnet.json").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("model"));
        assert!(message.contains("/nonexistent/flapnet.json"));
    }
}
