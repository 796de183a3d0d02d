use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a corpus file, one text per line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`, blank lines are kept (they hold no triple)
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let contents = fs::read_to_string(filename)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Tag of a corpus file: its name without extension.
///
/// Examples:
/// - `"./corpus/poems.txt"` → `"poems"`
/// - `"poems"` → `"poems"`
pub(crate) fn corpus_tag<P: AsRef<Path>>(path: P) -> io::Result<String> {
	path.as_ref()
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists the files of `dir` having the given extension.
///
/// Returns full paths, sorted. Subdirectories are not visited.
pub(crate) fn corpus_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
			files.push(path);
		}
	}
	files.sort();
	Ok(files)
}
