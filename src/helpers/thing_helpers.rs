use surrealdb::sql::Thing;

/// Strips a leading `table:` prefix from an id. Any other colon is part of
/// the key (catalog ids like `spotify:track:xyz` are opaque).
pub fn parse_id_part<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Bare record key, as exposed to clients.
pub fn thing_key(thing: &Thing) -> String {
    thing.id.to_raw()
}

pub fn create_user_thing(user_id: &str) -> Thing {
    let clean_id = parse_id_part("user", user_id);
    Thing::from(("user".to_string(), clean_id.to_string()))
}

pub fn create_song_thing(song_id: &str) -> Thing {
    let clean_id = parse_id_part("song", song_id);
    Thing::from(("song".to_string(), clean_id.to_string()))
}

pub fn create_comment_thing(comment_id: &str) -> Thing {
    let clean_id = parse_id_part("comment", comment_id);
    Thing::from(("comment".to_string(), clean_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_part() {
        assert_eq!(parse_id_part("user", "user:123"), "123");
        assert_eq!(parse_id_part("user", "123"), "123");
        assert_eq!(parse_id_part("song", "song:4uLU6hMCjMI75M1A2tKUQC"), "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(parse_id_part("comment", "comment:abc"), "abc");
    }

    #[test]
    fn test_parse_id_part_keeps_foreign_colons() {
        assert_eq!(parse_id_part("song", "spotify:track:AAA"), "spotify:track:AAA");
        assert_eq!(parse_id_part("song", "song:spotify:track:AAA"), "spotify:track:AAA");
        assert_eq!(parse_id_part("song", "songs:1"), "songs:1");
        assert_eq!(parse_id_part("user", "song:1"), "song:1");

        let a = create_song_thing("spotify:track:AAA");
        let b = create_song_thing("spotify:track:BBB");
        assert_ne!(a, b);
        assert_eq!(thing_key(&b), "spotify:track:BBB");
    }

    #[test]
    fn test_create_things() {
        let user_thing = create_user_thing("user:12");
        assert_eq!(user_thing.tb, "user");
        assert_eq!(thing_key(&user_thing), "12");

        let song_thing = create_song_thing("4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(song_thing.tb, "song");
        assert_eq!(thing_key(&song_thing), "4uLU6hMCjMI75M1A2tKUQC");

        let comment_thing = create_comment_thing("comment:9f3c");
        assert_eq!(comment_thing.tb, "comment");
        assert_eq!(thing_key(&comment_thing), "9f3c");
    }
}
