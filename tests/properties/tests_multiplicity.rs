use rstest::rstest;
use syster_integrity::multiplicity::{self, Multiplicity, UpperBound};

#[rstest]
#[case("1")]
#[case("0..1")]
#[case("3..5")]
#[case("2..*")]
#[case("*")]
fn test_canonical_text_round_trips(#[case] text: &str) {
    let bound = Multiplicity::parse(text).unwrap();
    assert_eq!(bound.to_string(), text);
    assert_eq!(bound.to_string().parse::<Multiplicity>().unwrap(), bound);
}

#[test]
fn test_every_small_bound_round_trips() {
    for lower in 0..6u64 {
        let mut uppers: Vec<UpperBound> = (lower.max(1)..8).map(UpperBound::Finite).collect();
        uppers.push(UpperBound::Unbounded);
        for upper in uppers {
            let bound = Multiplicity::new(lower, upper).unwrap();
            let text = bound.to_string();
            assert_eq!(multiplicity::parse(&text).unwrap(), bound, "{text}");
        }
    }
}

#[test]
fn test_check_size_fails_iff_outside_bound() {
    for lower in 0..5u64 {
        for upper in lower.max(1)..6 {
            let bound = Multiplicity::new(lower, UpperBound::Finite(upper)).unwrap();
            for size in 0..8usize {
                let outside = (size as u64) < lower || (size as u64) > upper;
                let result = multiplicity::check_size(size, &bound, "items");
                assert_eq!(result.is_err(), outside, "size {size} against {bound}");
            }
            assert!(bound.check_size(lower as usize, "items").is_ok());
            assert!(bound.check_size(upper as usize, "items").is_ok());
        }
    }
}

#[test]
fn test_unbounded_never_fails_above_lower() {
    for lower in 0..5u64 {
        let bound = Multiplicity::new(lower, UpperBound::Unbounded).unwrap();
        for size in 0..64usize {
            assert_eq!(bound.contains(size), size as u64 >= lower);
        }
    }
}
