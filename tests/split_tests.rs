use rstest::rstest;
use slapseg::config::{check_num_procs, FALLBACK_MAX_PROCS};
use slapseg::orchestrator::split_set;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("img{:03}.raw", i)).collect()
}

#[rstest]
#[case(10, 1, &[10])]
#[case(10, 2, &[5, 5])]
#[case(10, 3, &[4, 4, 2])]
#[case(7, 4, &[2, 2, 2, 1])]
#[case(12, 4, &[3, 3, 3, 3])]
#[case(1, 1, &[1])]
fn test_split_sizes(#[case] len: usize, #[case] num_sets: usize, #[case] sizes: &[usize]) {
    let combined = names(len);
    let sets = split_set(&combined, num_sets).unwrap();
    let actual: Vec<usize> = sets.iter().map(Vec::len).collect();
    assert_eq!(actual, sizes);
    assert_eq!(sets.concat(), combined);
}

#[test]
fn test_split_into_zero_sets() {
    assert!(split_set(&names(5), 0).unwrap().is_empty());
}

#[rstest]
#[case::more_sets_than_names(3, 4)]
#[case::last_set_would_be_empty(4, 3)]
#[case::last_set_would_be_empty_larger(9, 4)]
fn test_split_too_many_sets(#[case] len: usize, #[case] num_sets: usize) {
    let err = split_set(&names(len), num_sets).unwrap_err();
    assert!(err.to_string().contains("Too many sets"), "{}", err);
}

#[rstest]
#[case(1, Some(8), true)]
#[case(8, Some(8), true)]
#[case(9, Some(8), false)]
#[case(0, Some(8), false)]
#[case(FALLBACK_MAX_PROCS, None, true)]
#[case(FALLBACK_MAX_PROCS + 1, None, false)]
fn test_num_procs_limit(
    #[case] requested: usize,
    #[case] available: Option<usize>,
    #[case] accepted: bool,
) {
    assert_eq!(check_num_procs(requested, available).is_ok(), accepted);
}
