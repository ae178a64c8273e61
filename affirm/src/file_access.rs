use std::collections::HashMap;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use crate::AffirmError;
use crate::AffirmResult;

/// Read-then-rewrite access to one file. The source rewriter depends only
/// on this interface and never learns which implementation is active.
pub trait FileAccess {
	fn open_for_rewrite(&self, path: &Path) -> AffirmResult<Box<dyn SourceHandle + '_>>;
}

/// An open file: the full text for line-oriented reads plus a single
/// whole-content rewrite. Implementations release the underlying resource
/// when dropped, on every exit path.
pub trait SourceHandle {
	/// The file's full text as read at open time.
	fn content(&self) -> &str;

	/// Replace the file's entire content in one write.
	fn rewrite(&mut self, content: &str) -> AffirmResult<()>;
}

/// Real-filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFiles;

impl FileAccess for OsFiles {
	fn open_for_rewrite(&self, path: &Path) -> AffirmResult<Box<dyn SourceHandle + '_>> {
		let resolved = resolve_source_path(path);
		let mut file = OpenOptions::new().read(true).write(true).open(&resolved)?;
		let mut content = String::new();
		file.read_to_string(&mut content)?;
		Ok(Box::new(OsHandle { file, content }))
	}
}

struct OsHandle {
	file: File,
	content: String,
}

impl SourceHandle for OsHandle {
	fn content(&self) -> &str {
		&self.content
	}

	fn rewrite(&mut self, content: &str) -> AffirmResult<()> {
		self.file.seek(SeekFrom::Start(0))?;
		self.file.write_all(content.as_bytes())?;
		self.file.set_len(content.len() as u64)?;
		self.file.flush()?;
		Ok(())
	}
}

/// Compiler-reported source paths are relative to the directory `rustc` ran
/// in, which under cargo is the package or workspace root. Try the path as
/// given, then against `CARGO_MANIFEST_DIR`, then against its parent.
fn resolve_source_path(path: &Path) -> PathBuf {
	if path.is_file() {
		return path.to_path_buf();
	}
	if let Some(manifest_dir) = std::env::var_os("CARGO_MANIFEST_DIR") {
		let manifest_dir = PathBuf::from(manifest_dir);
		let candidate = manifest_dir.join(path);
		if candidate.is_file() {
			return candidate;
		}
		if let Some(workspace_dir) = manifest_dir.parent() {
			let candidate = workspace_dir.join(path);
			if candidate.is_file() {
				return candidate;
			}
		}
	}
	path.to_path_buf()
}

/// In-memory implementation keyed by path, for deterministic tests of the
/// rewriter. Clones share one underlying map, so a test can seed and
/// inspect files while the updater holds its own handle.
#[derive(Debug, Default, Clone)]
pub struct MemoryFiles {
	files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryFiles {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed a file.
	pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
		self.files
			.lock()
			.expect("memory files lock")
			.insert(path.into(), content.into());
	}

	/// Current content of a file, if present.
	pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
		self.files
			.lock()
			.expect("memory files lock")
			.get(path.as_ref())
			.cloned()
	}
}

impl FileAccess for MemoryFiles {
	fn open_for_rewrite(&self, path: &Path) -> AffirmResult<Box<dyn SourceHandle + '_>> {
		let content = self
			.get(path)
			.ok_or_else(|| AffirmError::FileNotFound(path.display().to_string()))?;
		Ok(Box::new(MemoryHandle {
			store: self.clone(),
			path: path.to_path_buf(),
			content,
		}))
	}
}

struct MemoryHandle {
	store: MemoryFiles,
	path: PathBuf,
	content: String,
}

impl SourceHandle for MemoryHandle {
	fn content(&self) -> &str {
		&self.content
	}

	fn rewrite(&mut self, content: &str) -> AffirmResult<()> {
		self.store.insert(self.path.clone(), content);
		Ok(())
	}
}
