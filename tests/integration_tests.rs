//! Integration tests for dir-sizer
//!
//! These tests create temporary file structures to test the sizer against
//! the real filesystem, and use in-memory or instrumented trees to check
//! composition, failure and concurrency properties.

use std::fs;
use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

use dir_sizer::fs::{Directory, File, Listing, MemoryDirectory, MemoryFile};
use dir_sizer::{Context, ContextError, SizeError, Sizer, SizerOptions, Totals};

/// Helper function to create a temporary directory structure for testing
fn create_test_directory() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a file of `len` bytes
fn create_file(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, vec![b'x'; len]).expect("Failed to write file");
}

/// Helper function to create a directory
fn create_dir(path: &Path) {
    fs::create_dir_all(path).expect("Failed to create directory");
}

fn sizer(threads: usize) -> Sizer {
    Sizer::new(&SizerOptions { threads }).expect("Failed to build sizer")
}

/// Directory that sleeps in `list` and records overlapping calls.
#[derive(Debug, Clone)]
struct SlowDirectory {
    width: usize,
    depth: usize,
    delay: Duration,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl SlowDirectory {
    fn new(width: usize, depth: usize, delay: Duration) -> Self {
        Self {
            width,
            depth,
            delay,
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Directory for SlowDirectory {
    fn list(&self, _ctx: &Context) -> anyhow::Result<Listing> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.active.fetch_sub(1, Ordering::SeqCst);

        let mut listing = Listing::default();
        listing
            .files
            .push(Box::new(MemoryFile::new("data", 100)) as Box<dyn File>);
        if self.depth > 0 {
            for _ in 0..self.width {
                listing.dirs.push(Box::new(Self {
                    depth: self.depth - 1,
                    ..self.clone()
                }));
            }
        }
        Ok(listing)
    }
}

/// A chain of `levels` nested directories, each holding one 1-byte file.
#[derive(Debug)]
struct ChainDirectory {
    levels: usize,
}

impl Directory for ChainDirectory {
    fn list(&self, _ctx: &Context) -> anyhow::Result<Listing> {
        let mut listing = Listing::default();
        listing
            .files
            .push(Box::new(MemoryFile::new("f", 1)) as Box<dyn File>);
        if self.levels > 0 {
            listing.dirs.push(Box::new(Self {
                levels: self.levels - 1,
            }));
        }
        Ok(listing)
    }
}

#[test]
fn test_sizes_local_tree() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_file(&base_path.join("a"), 10);
    create_file(&base_path.join("b"), 20);
    create_file(&base_path.join("sub").join("c"), 5);

    let totals = sizer(4)
        .size_path(&Context::background(), base_path)
        .unwrap();

    assert_eq!(totals, Totals { size: 35, count: 3 });
}

#[test]
fn test_sizes_deep_local_tree() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    let mut expected = Totals::default();
    let mut current = base_path.to_path_buf();
    for level in 0..10 {
        current = current.join(format!("level-{level}"));
        for i in 0..3 {
            let len = level * 10 + i;
            create_file(&current.join(format!("file-{i}.bin")), len);
            expected += Totals::file(i64::try_from(len).unwrap());
        }
        create_dir(&current.join("empty"));
    }

    let totals = sizer(2)
        .size_path(&Context::background(), base_path)
        .unwrap();

    assert_eq!(totals, expected);
}

#[test]
fn test_empty_local_directory() {
    let temp_dir = create_test_directory();
    create_dir(&temp_dir.path().join("a").join("b").join("c"));

    let totals = sizer(4)
        .size_path(&Context::background(), temp_dir.path())
        .unwrap();

    assert_eq!(totals, Totals::default());
}

#[test]
fn test_missing_root_fails() {
    let temp_dir = create_test_directory();

    let err = sizer(4)
        .size_path(&Context::background(), &temp_dir.path().join("missing"))
        .unwrap_err();

    assert!(matches!(err, SizeError::Traversal(_)));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_fails() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = create_test_directory();
    let locked = temp_dir.path().join("locked");
    create_file(&locked.join("secret"), 10);
    create_file(&temp_dir.path().join("visible"), 10);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read anything; only check when the lock holds.
    let locked_out = fs::read_dir(&locked).is_err();
    let result = sizer(4).size_path(&Context::background(), temp_dir.path());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if locked_out {
        assert!(result.is_err());
    } else {
        assert_eq!(result.unwrap(), Totals { size: 20, count: 2 });
    }
}

#[test]
fn test_recursive_composition() {
    let left = MemoryDirectory::new("left")
        .with_file("l1", 7)
        .with_dir(MemoryDirectory::new("deep").with_file("l2", 11));
    let right = MemoryDirectory::new("right").with_file("r1", 13);
    let root = MemoryDirectory::new("root")
        .with_file("top", 3)
        .with_dir(left.clone())
        .with_dir(right.clone());

    let sizer = sizer(4);
    let ctx = Context::background();

    let whole = sizer.size(&ctx, &root).unwrap();
    let parts = Totals::file(3) + sizer.size(&ctx, &left).unwrap() + sizer.size(&ctx, &right).unwrap();

    assert_eq!(whole, parts);
    assert_eq!(whole, Totals { size: 34, count: 4 });
}

#[test]
fn test_order_independence() {
    let children: Vec<MemoryDirectory> = (0..20)
        .map(|i| {
            MemoryDirectory::new(format!("d{i}"))
                .with_file("a", i)
                .with_file("b", i * 2)
        })
        .collect();

    let forward = children
        .iter()
        .cloned()
        .fold(MemoryDirectory::new("root"), MemoryDirectory::with_dir);
    let backward = children
        .iter()
        .rev()
        .cloned()
        .fold(MemoryDirectory::new("root"), MemoryDirectory::with_dir);

    let sizer = sizer(3);
    let ctx = Context::background();

    let a = sizer.size(&ctx, &forward).unwrap();
    let b = sizer.size(&ctx, &backward).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.count, 40);
    assert_eq!(a.size, forward.total_size());
}

#[test]
fn test_repeated_runs_agree() {
    let root = SlowDirectory::new(4, 3, Duration::ZERO);
    let sizer = sizer(4);
    let ctx = Context::background();

    let first = sizer.size(&ctx, &root).unwrap();
    for _ in 0..5 {
        assert_eq!(sizer.size(&ctx, &root).unwrap(), first);
    }

    // 1 + 4 + 16 + 64 directories, 100 bytes each.
    assert_eq!(first, Totals { size: 8_500, count: 85 });
}

#[test]
fn test_error_deep_in_tree_short_circuits() {
    let mut dir = MemoryDirectory::new("bottom")
        .with_file_handle(MemoryFile::new("corrupt", 1).failing("input/output error"));
    for level in 0..5 {
        dir = MemoryDirectory::new(format!("level-{level}"))
            .with_file("ok", 1)
            .with_dir(MemoryDirectory::new("sibling").with_file("fine", 1))
            .with_dir(dir);
    }

    let err = sizer(4).size(&Context::background(), &dir).unwrap_err();

    assert!(matches!(err, SizeError::Traversal(_)));
}

#[test]
fn test_broken_subdirectory_fails() {
    let root = MemoryDirectory::new("root")
        .with_file("a", 10)
        .with_dir(MemoryDirectory::new("broken").failing("no such device"));

    assert!(sizer(4).size(&Context::background(), &root).is_err());
}

#[test]
fn test_pre_cancelled_context() {
    let root = SlowDirectory::new(2, 2, Duration::ZERO);
    let ctx = Context::background();
    ctx.cancel();

    let err = sizer(4).size(&ctx, &root).unwrap_err();

    assert_eq!(err.context_error(), Some(ContextError::Cancelled));
    assert_eq!(root.peak.load(Ordering::SeqCst), 0);
}

#[test]
fn test_deadline_exceeded_during_traversal() {
    let root = SlowDirectory::new(4, 4, Duration::from_millis(20));
    let ctx = Context::with_timeout(Duration::from_millis(50));

    let err = sizer(2).size(&ctx, &root).unwrap_err();

    assert_eq!(err.context_error(), Some(ContextError::DeadlineExceeded));
}

#[test]
fn test_cancel_from_another_thread() {
    let root = SlowDirectory::new(4, 5, Duration::from_millis(10));
    let ctx = Context::background();
    let sizer = sizer(2);

    let result = thread::scope(|scope| {
        let handle = scope.spawn(|| sizer.size(&ctx, &root));
        thread::sleep(Duration::from_millis(30));
        ctx.cancel();
        handle.join().unwrap()
    });

    assert_eq!(result.unwrap_err().context_error(), Some(ContextError::Cancelled));
}

#[test]
fn test_concurrency_bound_with_wide_level() {
    let root = SlowDirectory::new(16, 1, Duration::from_millis(10));

    let totals = sizer(4).size(&Context::background(), &root).unwrap();

    assert_eq!(totals, Totals { size: 1_700, count: 17 });
    let peak = root.peak.load(Ordering::SeqCst);
    assert!(peak <= 4, "observed {peak} concurrent listings with 4 workers");
    assert!(peak >= 2, "siblings were listed one at a time with 4 workers");
}

#[test]
fn test_wide_level_uses_every_worker() {
    let root = SlowDirectory::new(16, 1, Duration::from_millis(30));

    sizer(4).size(&Context::background(), &root).unwrap();

    assert_eq!(root.peak.load(Ordering::SeqCst), 4);
}

#[test]
fn test_very_deep_chain() {
    let totals = sizer(4)
        .size(&Context::background(), &ChainDirectory { levels: 20_000 })
        .unwrap();

    assert_eq!(totals, Totals { size: 20_001, count: 20_001 });
}

#[test]
fn test_very_deep_local_tree() {
    let temp_dir = create_test_directory();

    let mut current = temp_dir.path().to_path_buf();
    for _ in 0..200 {
        current.push("d");
    }
    create_file(&current.join("leaf"), 7);

    let totals = sizer(2)
        .size_path(&Context::background(), temp_dir.path())
        .unwrap();

    assert_eq!(totals, Totals { size: 7, count: 1 });
}

#[test]
fn test_single_worker_is_sequential() {
    let root = SlowDirectory::new(3, 2, Duration::from_millis(2));

    let totals = sizer(1).size(&Context::background(), &root).unwrap();

    assert_eq!(totals.count, 13);
    assert_eq!(root.peak.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sizer_shared_between_threads() {
    let sizer = sizer(4);
    let root = MemoryDirectory::new("root")
        .with_file("a", 10)
        .with_dir(MemoryDirectory::new("b").with_file("c", 20));

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| sizer.size(&Context::background(), &root)))
            .collect();

        for handle in handles {
            assert_eq!(
                handle.join().unwrap().unwrap(),
                Totals { size: 30, count: 2 }
            );
        }
    });
}
