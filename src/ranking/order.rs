use crate::models::CountRecord;
use std::cmp::Ordering;

/// Total order used for every ranking: highest count first, then display
/// name ascending ignoring case. Names that only differ by case fall back to
/// the exact name and finally the entity id, so equal-count entities never
/// swap places between runs.
pub fn compare(a: &CountRecord, b: &CountRecord) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| compare_names(&a.entity.name, &b.entity.name))
        .then_with(|| a.entity.name.cmp(&b.entity.name))
        .then_with(|| a.entity.id.cmp(&b.entity.id))
}

// Ordinal comparison of upper-cased characters, independent of locale
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;

    fn record(id: &str, name: &str, count: u64) -> CountRecord {
        CountRecord::new(Entity::new(id, name), count)
    }

    #[test]
    fn higher_count_sorts_first() {
        let a = record("AB", "Alba", 3);
        let b = record("BV", "Brasov", 9);
        assert_eq!(compare(&a, &b), Ordering::Greater);
        assert_eq!(compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn ties_break_on_name_ignoring_case() {
        let a = record("2", "arad", 4);
        let b = record("1", "Bihor", 4);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare_names("CLUJ", "cluj"), Ordering::Equal);
        assert_eq!(compare_names("Iasi", "ilfov"), Ordering::Less);
    }

    #[test]
    fn punctuation_sorts_after_letters() {
        // Upper-case letters sort below the punctuation between 'Z' and 'a'
        assert_eq!(compare_names("a", "_x"), Ordering::Less);
        assert_eq!(compare_names("Sectia_2", "sectiab"), Ordering::Greater);
        let letter = record("1", "a", 2);
        let underscore = record("2", "_x", 2);
        assert_eq!(compare(&letter, &underscore), Ordering::Less);
    }

    #[test]
    fn same_name_falls_back_to_id() {
        let a = record("S-2", "Sectia 1", 0);
        let b = record("S-1", "Sectia 1", 0);
        assert_eq!(compare(&a, &b), Ordering::Greater);
    }
}
