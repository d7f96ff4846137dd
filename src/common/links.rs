/// Declares a many-to-many join entity with a composite primary key along
/// with helpers to read and replace the member set of one owner.
///
/// `link_table!("breeding_females", breeding_id: BreedingId, animal_id: AnimalId);`
#[macro_export]
macro_rules! link_table {
    ($table:tt, $owner:ident : $OwnerCol:ident, $member:ident : $MemberCol:ident) => {
        use sea_orm::ActiveValue::Set;
        use sea_orm::entity::prelude::*;
        use std::collections::HashMap;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = $table)]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub $owner: Uuid,
            #[sea_orm(primary_key, auto_increment = false)]
            pub $member: Uuid,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}

        pub async fn member_ids<C: ConnectionTrait>(db: &C, owner: Uuid) -> Result<Vec<Uuid>, DbErr> {
            Ok(Entity::find()
                .filter(Column::$OwnerCol.eq(owner))
                .all(db)
                .await?
                .into_iter()
                .map(|link| link.$member)
                .collect())
        }

        pub async fn owner_ids<C: ConnectionTrait>(db: &C, member: Uuid) -> Result<Vec<Uuid>, DbErr> {
            Ok(Entity::find()
                .filter(Column::$MemberCol.eq(member))
                .all(db)
                .await?
                .into_iter()
                .map(|link| link.$owner)
                .collect())
        }

        /// Member ids for each of `owners`, fetched in one query.
        pub async fn members_by_owner<C: ConnectionTrait>(
            db: &C,
            owners: &[Uuid],
        ) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
            let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
            if owners.is_empty() {
                return Ok(grouped);
            }
            let links = Entity::find()
                .filter(Column::$OwnerCol.is_in(owners.iter().copied()))
                .all(db)
                .await?;
            for link in links {
                grouped.entry(link.$owner).or_default().push(link.$member);
            }
            Ok(grouped)
        }

        /// Replaces the member set of `owner` with `members`.
        pub async fn replace<C: ConnectionTrait>(
            db: &C,
            owner: Uuid,
            members: &[Uuid],
        ) -> Result<(), DbErr> {
            Entity::delete_many()
                .filter(Column::$OwnerCol.eq(owner))
                .exec(db)
                .await?;

            let mut members = members.to_vec();
            members.sort_unstable();
            members.dedup();
            if members.is_empty() {
                return Ok(());
            }

            Entity::insert_many(members.into_iter().map(|member| ActiveModel {
                $owner: Set(owner),
                $member: Set(member),
            }))
            .exec_without_returning(db)
            .await?;
            Ok(())
        }
    };
}
