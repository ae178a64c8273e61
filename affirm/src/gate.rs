use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

static GLOBAL_GATE: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// One-shot latch guarding source-file rewrites. Across all holders of the
/// same gate exactly one [`acquire`](UpdateGate::acquire) succeeds, which is
/// what keeps two concurrent update attempts from both rewriting files.
#[derive(Debug, Clone)]
pub struct UpdateGate {
	flag: Arc<AtomicBool>,
}

impl UpdateGate {
	/// Handle to the single process-wide gate. Sessions created with
	/// [`Session::new`](crate::Session::new) share it, so at most one test
	/// file is rewritten per test binary run.
	pub fn global() -> Self {
		Self {
			flag: GLOBAL_GATE
				.get_or_init(|| Arc::new(AtomicBool::new(false)))
				.clone(),
		}
	}

	/// An independent gate, so tests of the update flow never consume the
	/// process-wide latch.
	pub fn isolated() -> Self {
		Self {
			flag: Arc::new(AtomicBool::new(false)),
		}
	}

	/// Atomically claim the gate. Returns true for exactly one caller over
	/// the gate's lifetime.
	pub fn acquire(&self) -> bool {
		!self.flag.swap(true, Ordering::SeqCst)
	}

	/// Whether the gate has already been claimed.
	pub fn is_set(&self) -> bool {
		self.flag.load(Ordering::SeqCst)
	}
}
