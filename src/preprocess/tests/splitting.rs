use super::*;
use crate::error::PrepError;
use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

fn assert_partition(split: &Split, rows: usize) {
    let train: BTreeSet<usize> = split.train.iter().copied().collect();
    let test: BTreeSet<usize> = split.test.iter().copied().collect();
    assert_eq!(train.len(), split.train.len(), "train rows are distinct");
    assert_eq!(test.len(), split.test.len(), "test rows are distinct");
    assert!(train.is_disjoint(&test), "train and test overlap");
    let all: BTreeSet<usize> = train.union(&test).copied().collect();
    assert_eq!(all, (0..rows).collect::<BTreeSet<_>>(), "rows were dropped");
}

fn ones(table: &Table, rows: &[usize]) -> usize {
    let target = table.series("target").unwrap().i64().unwrap();
    rows.iter().filter(|&&r| target.get(r) == Some(1)).count()
}

#[test]
fn test_random_split_is_complete_and_seeded() -> Result<()> {
    let split = random_split(300, 0.7, 42)?;
    assert_eq!(split.train.len(), 210);
    assert_eq!(split.test.len(), 90);
    assert_partition(&split, 300);

    assert_eq!(split, random_split(300, 0.7, 42)?);
    assert_ne!(split.train, random_split(300, 0.7, 7)?.train);
    Ok(())
}

#[test]
fn test_stratified_balanced_example() -> Result<()> {
    let table = Table::new(heart_frame(300, &[]));
    let split = stratified_split(&table, "target", 0.7, 123)?;

    assert_eq!(split.train.len(), 210);
    assert_eq!(split.test.len(), 90);
    assert_partition(&split, 300);
    assert_eq!(ones(&table, &split.train), 105);
    assert_eq!(ones(&table, &split.test), 45);
    Ok(())
}

#[test]
fn test_stratified_proportion_within_tolerance() -> Result<()> {
    // 1 in 3 rows is positive.
    let target: Vec<i64> = (0..500).map(|i| i64::from(i % 3 == 0)).collect();
    let table = Table::new(DataFrame::new(vec![Column::from(Series::new(
        "target".into(),
        target,
    ))])?);

    let global = ones(&table, &(0..500).collect::<Vec<_>>()) as f64 / 500.0;
    for seed in [1, 2, 3] {
        let split = stratified_split(&table, "target", 0.7, seed)?;
        assert_partition(&split, 500);
        assert_eq!(split.train.len(), 350);
        let share = ones(&table, &split.train) as f64 / split.train.len() as f64;
        assert!((share - global).abs() <= 0.02, "share {share} vs {global}");
    }
    Ok(())
}

#[test]
fn test_missing_outcome_rows_are_kept() -> Result<()> {
    let target = vec![Some(0i64), Some(1), None, Some(0), Some(1), None, Some(0), Some(1)];
    let table = Table::new(DataFrame::new(vec![Column::from(Series::new(
        "target".into(),
        target,
    ))])?);

    let split = stratified_split(&table, "target", 0.5, 9)?;
    assert_partition(&split, 8);
    assert_eq!(split.train.len(), 4);
    Ok(())
}

#[test]
fn test_single_level_outcome_fails() -> Result<()> {
    let table = Table::new(DataFrame::new(vec![Column::from(Series::new(
        "target".into(),
        vec![Some(1i64), Some(1), None],
    ))])?);

    let err = stratified_split(&table, "target", 0.7, 1).unwrap_err();
    assert!(matches!(
        err,
        PrepError::InvalidStratificationTarget { levels: 1, .. }
    ));
    Ok(())
}

#[test]
fn test_unknown_outcome_fails() {
    let table = Table::new(heart_frame(10, &[]));
    assert!(matches!(
        stratified_split(&table, "num", 0.7, 1),
        Err(PrepError::ColumnNotFound(_))
    ));
    assert!(matches!(
        Task::regression("reg", Arc::new(table), "chol", 0.7, 1),
        Err(PrepError::ColumnNotFound(_))
    ));
}

#[test]
fn test_tasks_share_table_and_exclude_outcome() -> Result<()> {
    let table = Arc::new(Table::new(heart_frame(40, &[])));
    let regression = Task::regression("age-reg", Arc::clone(&table), "age", 0.7, 5)?;
    let classification = Task::classification("target-clf", Arc::clone(&table), "target", 0.7, 5)?;

    assert!(Arc::ptr_eq(&regression.table, &classification.table));
    assert_eq!(regression.covariates, vec!["cp", "oldpeak", "target"]);
    assert_eq!(classification.covariates, vec!["age", "cp", "oldpeak"]);
    assert_eq!(regression.split.train.len(), 28);
    assert_eq!(classification.split.train.len(), 28);

    let record = classification.record();
    assert_eq!(record.kind, TaskKind::Classification);
    assert_eq!(record.train_rows, classification.split.train);
    Ok(())
}

#[test]
fn test_tied_levels_follow_natural_order() -> Result<()> {
    // Equal quotas of 1.5 rows; the spare training row goes to level 2, not 10.
    let table = Table::new(DataFrame::new(vec![Column::from(Series::new(
        "grade".into(),
        vec![10i64, 2, 10, 2, 2, 10],
    ))])?);

    let split = stratified_split(&table, "grade", 0.5, 3)?;
    assert_partition(&split, 6);
    assert_eq!(split.train.len(), 3);

    let grade = table.series("grade")?.i64()?;
    let twos = split
        .train
        .iter()
        .filter(|&&row| grade.get(row) == Some(2))
        .count();
    assert_eq!(twos, 2);
    Ok(())
}

#[test]
fn test_text_outcome_is_stratified() -> Result<()> {
    let labels: Vec<&str> = (0..20).map(|i| if i % 4 == 0 { "yes" } else { "no" }).collect();
    let table = Table::new(DataFrame::new(vec![Column::from(Series::new(
        "target".into(),
        labels,
    ))])?);

    let split = stratified_split(&table, "target", 0.5, 11)?;
    assert_partition(&split, 20);
    let target = table.series("target")?.str()?;
    let yes = split
        .train
        .iter()
        .filter(|&&row| target.get(row) == Some("yes"))
        .count();
    assert_eq!(yes, 2, "the spare row goes to the larger level");
    Ok(())
}
