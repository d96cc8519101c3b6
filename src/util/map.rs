use std::collections::HashMap;

/// Lookup key of a record.
pub trait Keyable {
    fn key(&self) -> String;
}

/// Indexes `entities` by key; on duplicate keys the first entity wins.
pub fn vec_to_hashmap<T: Keyable + Clone>(entities: &[T]) -> HashMap<String, T> {
    let mut map = HashMap::with_capacity(entities.len());
    for e in entities {
        map.entry(e.key()).or_insert_with(|| e.clone());
    }
    map
}
