//! Shared blocks used from many threads at once.

use std::sync::Arc;
use std::thread;

use ntest::timeout;

use row_block_core::RowBlock;

use super::helpers::{build_block, model_rows, read_rows};

#[timeout(5000)]
#[test]
fn test_concurrent_operations_on_shared_block() -> anyhow::Result<()> {
    let rows = model_rows(64, 5);
    let block = Arc::new(build_block(&rows, true));
    let expected_size = block.size_in_bytes();

    thread::scope(|scope| -> anyhow::Result<()> {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let block = Arc::clone(&block);
                let rows = &rows;
                scope.spawn(move || -> anyhow::Result<()> {
                    for round in 0..50 {
                        let start = (worker * 7 + round) % 60;
                        let view = block.region(start, 4)?;
                        assert_eq!(read_rows(&view)?, rows[start..start + 4].to_vec());

                        let copy = block.copy_region(start, 4)?;
                        assert_eq!(read_rows(&copy)?, rows[start..start + 4].to_vec());

                        let positions = [start + 3, start, start + 1];
                        let gathered = block.gather(&positions)?;
                        let expected: Vec<_> = positions.iter().map(|&p| rows[p].clone()).collect();
                        assert_eq!(read_rows(&gathered)?, expected);

                        assert_eq!(block.size_in_bytes(), expected_size);
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("worker panicked"))??;
        }
        Ok(())
    })?;

    // The source block is untouched by everything derived from it
    assert_eq!(read_rows(&block)?, rows);
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_blocks_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RowBlock>();
    assert_send_sync::<row_block_core::SingleRowBlock>();
}
