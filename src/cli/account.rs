use tabled::{Table, Tabled};

use crate::{cli::shared::UNAVAILABLE, context::AppContext, models::user::UserProfile};

#[derive(Debug, Tabled)]
struct Field {
    field: &'static str,
    value: String,
}

fn profile_fields(profile: UserProfile) -> Vec<Field> {
    vec![
        Field {
            field: "Name",
            value: profile.name.unwrap_or_else(|| UNAVAILABLE.to_string()),
        },
        Field {
            field: "Email",
            value: profile.email,
        },
        Field {
            field: "Picture",
            value: profile.picture.unwrap_or_else(|| UNAVAILABLE.to_string()),
        },
        Field {
            field: "ID",
            value: profile.id,
        },
    ]
}

pub async fn profile(ctx: &AppContext) -> anyhow::Result<()> {
    let profile = ctx.backend.profile().await?;
    println!("{}", Table::new(&profile_fields(profile)));
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.backend.logout().await?;
    println!("Signed out. Remove ETF_SESSION_TOKEN from your environment to continue as guest.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_lists_every_field() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id":"u1","email":"a@example.com","picture":"https://example.com/a.png"}"#,
        )
        .unwrap();

        let fields = profile_fields(profile);
        let value_of = |name: &str| {
            fields
                .iter()
                .find(|f| f.field == name)
                .map(|f| f.value.clone())
                .unwrap()
        };

        assert_eq!(value_of("Name"), UNAVAILABLE);
        assert_eq!(value_of("Email"), "a@example.com");
        assert_eq!(value_of("Picture"), "https://example.com/a.png");
        assert_eq!(value_of("ID"), "u1");
    }
}
