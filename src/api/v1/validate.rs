use crate::application_port::ContentUpdate;
use crate::domain_model::{JobPosting, PageRequest, PaginationLimits, TeamMember};

/// Entity-escape inbound text so stored strings are inert when rendered.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// URL fields are only trimmed, never escaped: validation rejects anything
/// that is not a plain http(s) URL, and escaping the slashes would corrupt
/// every legitimate link.
pub fn sanitize_update(update: &mut ContentUpdate) {
    if let Some(team) = update.team.as_mut() {
        for member in team {
            member.name = sanitize_text(member.name.trim());
            member.role = sanitize_text(member.role.trim());
            member.bio = sanitize_text(member.bio.trim());
            member.image = member.image.trim().to_string();
        }
    }
    if let Some(careers) = update.careers.as_mut() {
        for job in careers {
            job.title = sanitize_text(job.title.trim());
            job.location = sanitize_text(job.location.trim());
            job.description = sanitize_text(job.description.trim());
            job.apply_url = job.apply_url.trim().to_string();
        }
    }
}

pub fn validate_pagination(
    page: Option<u32>,
    limit: Option<u32>,
    limits: PaginationLimits,
) -> Result<PageRequest, String> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(limits.default_page_size);

    if page < 1 {
        return Err("page must be greater than 0".to_string());
    }
    if limit < 1 || limit > limits.max_page_size {
        return Err(format!(
            "limit must be between 1 and {}",
            limits.max_page_size
        ));
    }

    Ok(PageRequest { page, limit })
}

fn is_url(value: &str) -> bool {
    (value.starts_with("http://") || value.starts_with("https://"))
        && !value.contains(['<', '>', '"', '\'', ' '])
}

fn check_member(member: &TeamMember) -> Result<(), String> {
    if member.name.is_empty() {
        return Err("team member name is required".to_string());
    }
    if member.name.len() > 100 {
        return Err("name must be less than 100 characters".to_string());
    }
    if member.role.is_empty() {
        return Err("role is required".to_string());
    }
    if member.role.len() > 100 {
        return Err("role must be less than 100 characters".to_string());
    }
    if member.bio.len() > 500 {
        return Err("bio must be less than 500 characters".to_string());
    }
    if !member.image.is_empty() && !is_url(&member.image) {
        return Err("image must be a valid URL".to_string());
    }
    Ok(())
}

fn check_job(job: &JobPosting) -> Result<(), String> {
    if job.title.is_empty() {
        return Err("job title is required".to_string());
    }
    if job.title.len() > 100 {
        return Err("title must be less than 100 characters".to_string());
    }
    if job.location.is_empty() {
        return Err("location is required".to_string());
    }
    if job.location.len() > 100 {
        return Err("location must be less than 100 characters".to_string());
    }
    if job.description.is_empty() {
        return Err("description is required".to_string());
    }
    if job.description.len() > 1000 {
        return Err("description must be less than 1000 characters".to_string());
    }
    if !is_url(&job.apply_url) {
        return Err("apply URL must be valid".to_string());
    }
    Ok(())
}

/// Field-level checks mirroring what the admin frontend promises. Runs after
/// sanitization, so the length limits apply to the escaped form that will
/// actually be stored.
pub fn validate_update(update: &ContentUpdate) -> Result<(), String> {
    if let Some(team) = &update.team {
        for member in team {
            check_member(member)?;
        }
    }
    if let Some(careers) = &update.careers {
        for job in careers {
            check_job(job)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{JobStatus, JobType};

    fn limits() -> PaginationLimits {
        PaginationLimits {
            default_page_size: 10,
            max_page_size: 100,
        }
    }

    #[test]
    fn pagination_defaults_apply() {
        let req = validate_pagination(None, None, limits()).unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn pagination_bounds_are_enforced() {
        assert!(validate_pagination(Some(0), Some(10), limits()).is_err());
        assert!(validate_pagination(Some(1), Some(0), limits()).is_err());
        assert!(validate_pagination(Some(1), Some(1000), limits()).is_err());
        assert!(validate_pagination(Some(1), Some(100), limits()).is_ok());
    }

    #[test]
    fn script_tags_are_escaped() {
        let out = sanitize_text("<script>alert(\"xss\")</script>");
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut update = ContentUpdate {
            team: Some(vec![TeamMember {
                name: "   ".to_string(),
                role: "Engineer".to_string(),
                bio: String::new(),
                image: String::new(),
                order: 0,
                active: true,
            }]),
            careers: None,
        };
        sanitize_update(&mut update);
        assert!(validate_update(&update).is_err());
    }

    #[test]
    fn valid_job_passes() {
        let update = ContentUpdate {
            team: None,
            careers: Some(vec![JobPosting {
                title: "Engineer".to_string(),
                location: "Remote".to_string(),
                job_type: JobType::FullTime,
                description: "Build things".to_string(),
                apply_url: "https://example.com/apply".to_string(),
                status: JobStatus::Active,
                deadline: None,
                order: 0,
            }]),
        };
        assert!(validate_update(&update).is_ok());
    }

    #[test]
    fn bad_apply_url_is_rejected() {
        let update = ContentUpdate {
            team: None,
            careers: Some(vec![JobPosting {
                title: "Engineer".to_string(),
                location: "Remote".to_string(),
                job_type: JobType::Contract,
                description: "Build things".to_string(),
                apply_url: "javascript:alert(1)".to_string(),
                status: JobStatus::Active,
                deadline: None,
                order: 0,
            }]),
        };
        assert!(validate_update(&update).is_err());
    }
}
