// Batching utility for chunked cross-store fetches
//
// Stores bound the size of a single request (a VALUES clause or an IN list
// can only grow so far), so large identifier sets are partitioned into
// fixed-size chunks before querying. Independent of the merge algorithm:
// each chunk just yields one more batch of partial results.

/// Identifiers per chunk for batched identifier fetches.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Partition `items` into consecutive chunks of at most `size` elements.
/// A zero `size` is treated as one unbounded chunk.
pub fn chunked<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![items.to_vec()];
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple() {
        let items: Vec<u32> = (0..100).collect();
        let chunks = chunked(&items, 50);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 50);
        assert_eq!(chunks[1].len(), 50);
    }

    #[test]
    fn test_remainder_chunk() {
        let items: Vec<u32> = (0..101).collect();
        let chunks = chunked(&items, 50);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2], vec![100]);
    }

    #[test]
    fn test_no_items_no_chunks() {
        let chunks = chunked::<u32>(&[], 50);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_zero_size_is_unbounded() {
        let items: Vec<u32> = (0..7).collect();
        let chunks = chunked(&items, 0);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 7);
    }

    #[test]
    fn test_chunks_preserve_order_without_loss() {
        let items: Vec<u32> = (0..123).collect();
        let rejoined: Vec<u32> = chunked(&items, 50).into_iter().flatten().collect();

        assert_eq!(rejoined, items);
    }
}
