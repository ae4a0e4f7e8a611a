/// Autocompletes a typed name: the position and lowercased form of the first name starting with `value`
pub fn search<'a, I>(names: I, value: &str) -> Option<(usize, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = value.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    names
        .into_iter()
        .map(str::to_lowercase)
        .enumerate()
        .find(|(_, label)| label.starts_with(&needle))
}
