//! Tests for cardinal directions

#[cfg(test)]
mod tests {
    use tileweave::spatial::direction::Direction;

    // Tests every direction's opposite is its inverse
    // Verified by mapping East to East
    #[test]
    fn test_opposite_is_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.opposite(), Direction::West);
    }

    // Tests offsets of opposite directions cancel out
    // Verified by flipping the sign of the north offset
    #[test]
    fn test_offsets_cancel() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.offset();
            let (ox, oy) = direction.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
        assert_eq!(Direction::North.offset(), (0, -1));
    }

    // Tests indices follow north, east, south, west
    // Verified by swapping south and west indices
    #[test]
    fn test_index_order() {
        let indices: Vec<usize> = Direction::ALL.iter().map(|d| d.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(Direction::West.to_string(), "west");
    }
}
