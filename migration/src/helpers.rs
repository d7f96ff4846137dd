use sea_orm_migration::prelude::*;

/// Application-generated UUID primary key (same on Postgres and SQLite).
pub fn id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().primary_key().to_owned()
}

pub fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

/// Many-to-many join table with a composite primary key. Both sides cascade
/// on delete so removing either record drops the membership row.
pub fn link_table(
    table: &str,
    owner_col: &str,
    owner_table: &str,
    member_col: &str,
    member_table: &str,
) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new(owner_col)).uuid().not_null())
        .col(ColumnDef::new(Alias::new(member_col)).uuid().not_null())
        .primary_key(
            Index::create()
                .col(Alias::new(owner_col))
                .col(Alias::new(member_col)),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_{owner_col}"))
                .from(Alias::new(table), Alias::new(owner_col))
                .to(Alias::new(owner_table), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::NoAction),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_{member_col}"))
                .from(Alias::new(table), Alias::new(member_col))
                .to(Alias::new(member_table), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::NoAction),
        )
        .to_owned()
}

pub fn drop_table(table: &str) -> TableDropStatement {
    Table::drop()
        .table(Alias::new(table))
        .if_exists()
        .to_owned()
}
