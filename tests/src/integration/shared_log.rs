//! # Shared Log Flows
//!
//! Several writers, each with its own `FileDataStore` handle, append to one
//! file at the same time, as separate processes would.

#[cfg(test)]
mod tests {
    use crate::fixtures::init_tracing;
    use rand::Rng;
    use sd_01_chunk_store::{ChunkStoreConfig, DataEntry, DataStore, FileDataStore};
    use std::path::Path;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    const WRITERS: usize = 4;
    const ENTRIES_PER_WRITER: usize = 25;

    fn open_store(path: &Path) -> FileDataStore {
        let mut store = FileDataStore::new(path, ChunkStoreConfig::default());
        store.init().unwrap();
        store
    }

    /// Payload tagged with its writer and sequence number.
    fn payload(writer: usize, sequence: usize, len: usize) -> Vec<u8> {
        let mut data = vec![writer as u8, sequence as u8];
        data.extend((0..len).map(|i| (writer * 31 + sequence + i) as u8));
        data
    }

    fn spawn_writers(path: &Path) -> Vec<thread::JoinHandle<Vec<DataEntry>>> {
        let barrier = Arc::new(Barrier::new(WRITERS));
        (0..WRITERS)
            .map(|writer| {
                let path = path.to_path_buf();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let mut store = open_store(&path);
                    let mut rng = rand::thread_rng();
                    barrier.wait();
                    (0..ENTRIES_PER_WRITER)
                        .map(|sequence| {
                            let len = rng.gen_range(0..2_000);
                            let entry = DataEntry::new(1, payload(writer, sequence, len));
                            store.write(&entry).unwrap();
                            entry
                        })
                        .collect()
                })
            })
            .collect()
    }

    fn assert_all_present(written: &[Vec<DataEntry>], read: &[DataEntry]) {
        assert_eq!(read.len(), WRITERS * ENTRIES_PER_WRITER);
        for entries in written {
            // Each writer's entries appear intact and in the order it wrote them
            let positions: Vec<usize> = entries
                .iter()
                .map(|entry| read.iter().position(|r| r == entry).expect("entry read back"))
                .collect();
            assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_concurrent_writers_interleave_safely() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.sd");

        let written: Vec<Vec<DataEntry>> = spawn_writers(&path)
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        let mut reader = open_store(&path);
        let read = reader.read().unwrap();
        assert_all_present(&written, &read);
        assert_eq!(reader.pending_chunks(), 0);
        assert!(reader.read().unwrap().is_empty());
    }

    #[test]
    fn test_reader_polls_while_writers_append() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.sd");
        let mut reader = open_store(&path);

        let handles = spawn_writers(&path);
        let mut read = Vec::new();
        while !handles.iter().all(|handle| handle.is_finished()) {
            match reader.read() {
                Ok(entries) => read.extend(entries),
                // A chunk caught mid-append; the cursor stays put
                Err(e) if e.is_protocol() => {}
                Err(e) => panic!("read failed: {e}"),
            }
            thread::yield_now();
        }
        let written: Vec<Vec<DataEntry>> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        read.extend(reader.read().unwrap());

        assert_all_present(&written, &read);
    }
}
