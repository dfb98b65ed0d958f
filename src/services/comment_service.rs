use std::collections::HashMap;

use surrealdb::{engine::any::Any, sql::Thing, Surreal};
use uuid::Uuid;

use crate::{
    error::Result,
    helpers::{
        comment_helpers::find_comment,
        song_helpers::song_exists,
        thing_helpers::{create_comment_thing, create_song_thing, create_user_thing, thing_key},
    },
    models::{
        comment::{
            CommentNode, CommentPage, CommentPageQuery, CommentRow, CommentSort, DeletedComment,
            COMMENT_ROW_FIELDS,
        },
        database_helpers::CountResult,
        pagination::has_more,
        user::CommentAuthor,
    },
    services::trending_service::{TrendingConfig, ON_ENGAGEMENT_ADDED, ON_ENGAGEMENT_REMOVED},
    validators::comment_validator::CommentValidator,
    Error,
};

pub struct CommentService;

impl CommentService {
    fn order_by(sort: CommentSort) -> &'static str {
        match sort {
            CommentSort::Top => "likes DESC, created_at DESC",
            CommentSort::Recent => "created_at DESC",
        }
    }

    pub async fn add_comment(
        db: &Surreal<Any>,
        config: &TrendingConfig,
        song_id: &str,
        user_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<CommentNode> {
        let content = CommentValidator::validate_content(content)?;

        if !song_exists(db, song_id).await? {
            return Err(Error::SongNotFound {
                id: song_id.to_string(),
            });
        }

        let song_thing = create_song_thing(song_id);

        // Replies carry their thread's top-level comment in `root`.
        let (parent, root) = match parent_id {
            Some(parent_id) => {
                let parent = find_comment(db, parent_id)
                    .await?
                    .ok_or_else(|| Error::CommentNotFound {
                        id: parent_id.to_string(),
                    })?;

                if parent.song != song_thing {
                    return Err(Error::InvalidInput {
                        reason: "Parent comment belongs to another song".to_string(),
                    });
                }

                let root = parent.root.clone().unwrap_or_else(|| parent.id.clone());
                (Some(parent.id), Some(root))
            }
            None => (None, None),
        };

        let comment_thing = create_comment_thing(&Uuid::new_v4().simple().to_string());

        let sql = format!(
            r#"
            BEGIN TRANSACTION;
            CREATE $comment SET
                content = $content,
                song = $song,
                user = $user,
                parent = $parent,
                root = $root,
                created_at = time::now()
            RETURN NONE;
            {}
            COMMIT TRANSACTION;
            "#,
            ON_ENGAGEMENT_ADDED
        );

        db.query(sql)
            .bind(("comment", comment_thing.clone()))
            .bind(("content", content))
            .bind(("song", song_thing))
            .bind(("user", create_user_thing(user_id)))
            .bind(("parent", parent))
            .bind(("root", root))
            .bind(("weight", config.comment_weight))
            .await?
            .check()?;

        let rows = Self::fetch_rows_by_ids(db, vec![comment_thing.clone()]).await?;
        let row = rows.into_iter().next().ok_or_else(|| {
            Error::DbError(format!("comment {} missing after insert", thing_key(&comment_thing)))
        })?;

        tracing::info!(comment_id = %thing_key(&comment_thing), song_id, user_id, "comment added");

        Ok(Self::to_node(row, Vec::new(), false))
    }

    /// Deletes a comment and, through the storage cascade, its whole subtree.
    ///
    /// The song's score is charged a single comment weight per call, whatever
    /// the number of cascaded replies.
    pub async fn delete_comment(
        db: &Surreal<Any>,
        config: &TrendingConfig,
        comment_id: &str,
        caller_id: &str,
    ) -> Result<DeletedComment> {
        let comment = find_comment(db, comment_id)
            .await?
            .ok_or_else(|| Error::CommentNotFound {
                id: comment_id.to_string(),
            })?;

        if comment.user != create_user_thing(caller_id) {
            return Err(Error::PermissionDenied {
                reason: "Only the author can delete this comment".to_string(),
            });
        }

        let sql = format!(
            r#"
            BEGIN TRANSACTION;
            DELETE $comment RETURN NONE;
            {}
            COMMIT TRANSACTION;
            "#,
            ON_ENGAGEMENT_REMOVED
        );

        db.query(sql)
            .bind(("comment", comment.id.clone()))
            .bind(("song", comment.song))
            .bind(("weight", config.comment_weight))
            .await?
            .check()?;

        let id = thing_key(&comment.id);
        tracing::info!(comment_id = %id, caller_id, "comment deleted");

        Ok(DeletedComment { id, deleted: true })
    }

    pub async fn fetch_comment_page(
        db: &Surreal<Any>,
        song_id: &str,
        query: &CommentPageQuery,
        viewer_id: Option<&str>,
    ) -> Result<CommentPage> {
        if !song_exists(db, song_id).await? {
            return Err(Error::SongNotFound {
                id: song_id.to_string(),
            });
        }

        let limit = query.limit();
        let offset = query.offset();
        let viewer = viewer_id.map(create_user_thing);

        let count_sql =
            "SELECT count() AS total FROM comment WHERE song = $song AND parent = NONE GROUP ALL";
        let roots_sql = format!(
            "SELECT {} FROM comment WHERE song = $song AND parent = NONE ORDER BY {} LIMIT {} START {}",
            COMMENT_ROW_FIELDS,
            Self::order_by(query.sort()),
            limit,
            offset
        );

        let mut response = db
            .query(count_sql)
            .query(roots_sql)
            .bind(("song", create_song_thing(song_id)))
            .bind(("viewer", viewer.clone()))
            .await?;

        let count: Option<CountResult> = response.take(0)?;
        let roots: Vec<CommentRow> = response.take(1)?;
        let total_count = count.map(|c| c.total).unwrap_or(0);

        let replies = if roots.is_empty() {
            Vec::new()
        } else {
            let root_things: Vec<Thing> = roots.iter().map(|r| r.id.clone()).collect();
            let replies_sql = format!(
                "SELECT {} FROM comment WHERE root IN $roots ORDER BY created_at ASC",
                COMMENT_ROW_FIELDS
            );

            let replies: Vec<CommentRow> = db
                .query(replies_sql)
                .bind(("roots", root_things))
                .bind(("viewer", viewer))
                .await?
                .take(0)?;
            replies
        };

        let has_more = has_more(offset, roots.len(), total_count);
        let comments = build_comment_tree(roots, replies, viewer_id.is_some());

        Ok(CommentPage {
            comments,
            has_more,
            total_count,
        })
    }

    async fn fetch_rows_by_ids(db: &Surreal<Any>, ids: Vec<Thing>) -> Result<Vec<CommentRow>> {
        let sql = format!("SELECT {} FROM comment WHERE id IN $ids", COMMENT_ROW_FIELDS);

        let rows: Vec<CommentRow> = db
            .query(sql)
            .bind(("ids", ids))
            .bind(("viewer", None::<Thing>))
            .await?
            .take(0)?;

        Ok(rows)
    }

    fn to_node(row: CommentRow, replies: Vec<CommentNode>, viewer_known: bool) -> CommentNode {
        CommentNode {
            id: thing_key(&row.id),
            content: row.content,
            created_at: row.created_at.0,
            user: CommentAuthor {
                id: thing_key(&row.author),
                name: row.author_name,
                image: row.author_image,
            },
            likes: row.likes,
            current_user_liked: viewer_known && row.current_user_liked,
            replies,
        }
    }
}

/// Links flat rows into trees.
///
/// `roots` keep their given order; every reply is attached under its parent,
/// siblings ordered oldest first. Replies whose parent is not part of the
/// loaded window are dropped.
pub fn build_comment_tree(
    roots: Vec<CommentRow>,
    replies: Vec<CommentRow>,
    viewer_known: bool,
) -> Vec<CommentNode> {
    let mut children: HashMap<String, Vec<CommentRow>> = HashMap::new();
    for reply in replies {
        if let Some(parent) = &reply.parent {
            children.entry(thing_key(parent)).or_default().push(reply);
        }
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| a.created_at.0.cmp(&b.created_at.0));
    }

    roots
        .into_iter()
        .map(|root| link_replies(root, &mut children, viewer_known))
        .collect()
}

fn link_replies(
    row: CommentRow,
    children: &mut HashMap<String, Vec<CommentRow>>,
    viewer_known: bool,
) -> CommentNode {
    // `remove` hands each child list out once, so a malformed parent cycle
    // cannot loop.
    let replies = children
        .remove(&thing_key(&row.id))
        .unwrap_or_default()
        .into_iter()
        .map(|child| link_replies(child, children, viewer_known))
        .collect();

    CommentService::to_node(row, replies, viewer_known)
}
