//! Generators for creating test DSL documents.

/// Creates a workflow running one `sampleActivity` over `var1` and `var2`.
///
/// # Returns
///
/// A YAML document binding the result to `resultVar`.
pub fn create_single_activity_dsl() -> String {
    r#"
variables:
  var1: value1
  var2: value2
root:
  activity:
    name: sampleActivity
    arguments: [var1, var2]
    result: resultVar
"#
    .to_string()
}

/// Creates a sequence invoking each named activity in turn.
///
/// # Arguments
///
/// * `names` - Activity names; element `i` writes `resultVar{i+1}` and reads `var1`
///
/// # Returns
///
/// A YAML document with `var1: value1` as its only variable.
pub fn create_sequence_dsl(names: &[&str]) -> String {
    let mut dsl = String::from("variables:\n  var1: value1\nroot:\n  sequence:\n    elements:\n");
    for (index, name) in names.iter().enumerate() {
        dsl.push_str(&format!(
            "      - activity:\n          name: {}\n          arguments: [var1]\n          result: resultVar{}\n",
            name,
            index + 1
        ));
    }
    dsl
}

/// Creates a parallel block with one branch per named activity.
///
/// # Arguments
///
/// * `names` - Activity names; branch `i` writes `resultVar{i+1}` and reads `var1`
///
/// # Returns
///
/// A YAML document with `var1: value1` as its only variable.
pub fn create_parallel_dsl(names: &[&str]) -> String {
    let mut dsl = String::from("variables:\n  var1: value1\nroot:\n  parallel:\n    branches:\n");
    for (index, name) in names.iter().enumerate() {
        dsl.push_str(&format!(
            "      - activity:\n          name: {}\n          arguments: [var1]\n          result: resultVar{}\n",
            name,
            index + 1
        ));
    }
    dsl
}
