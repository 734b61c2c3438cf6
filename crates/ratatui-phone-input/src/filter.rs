//! Country search.

use crate::country::Country;

/// Countries whose name contains `query` (trimmed, case-insensitive), in source order.
///
/// A blank query matches everything.
pub fn filter_countries<'a>(countries: &'a [Country], query: &str) -> Vec<&'a Country> {
    filter_indices(countries, query)
        .into_iter()
        .map(|i| &countries[i])
        .collect()
}

/// Index flavour of [`filter_countries`], for callers that keep the list elsewhere.
pub fn filter_indices(countries: &[Country], query: &str) -> Vec<usize> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return (0..countries.len()).collect();
    }
    countries
        .iter()
        .enumerate()
        .filter(|(_, c)| c.name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::builtin;

    fn names(list: &[&Country]) -> Vec<String> {
        list.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let list = builtin();
        for q in ["", "   ", "\t"] {
            let out = filter_countries(&list, q);
            assert_eq!(out.len(), list.len());
            assert!(out.iter().zip(list.iter()).all(|(a, b)| *a == b));
        }
    }

    #[test]
    fn united_matches_three_in_source_order() {
        let list = builtin();
        assert_eq!(
            names(&filter_countries(&list, "United")),
            vec!["United Arab Emirates", "United Kingdom", "United States"]
        );
    }

    #[test]
    fn match_is_case_insensitive_and_trimmed() {
        let list = builtin();
        let a = filter_countries(&list, "Viet");
        assert_eq!(a, filter_countries(&list, "viet"));
        assert_eq!(a, filter_countries(&list, "  VIET "));
        assert_eq!(names(&a), vec!["Vietnam"]);
    }

    #[test]
    fn partitions_list_by_substring() {
        let list = builtin();
        for q in ["an", "Guinea", "ia", "z", "land"] {
            let needle = q.to_lowercase();
            let kept = filter_indices(&list, q);
            for (i, c) in list.iter().enumerate() {
                let matches = c.name.to_lowercase().contains(&needle);
                assert_eq!(kept.contains(&i), matches, "{q:?} vs {}", c.name);
            }
            assert!(kept.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn no_match_yields_empty() {
        let list = builtin();
        assert!(filter_countries(&list, "atlantis").is_empty());
    }
}
