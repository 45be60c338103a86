//! JSON view models for each section
//!
//! These renderers resolve the cell conventions (markup, image formulas,
//! links to other sections) into ready-to-template values. They are what the
//! service binary prints; page templates consume the same shapes.
use serde_json::{json, Value};

use crate::cell::{
    extract_image_url, format_text, normalize_icon, phone_to_link, plain_text, slugify,
    to_key_value,
};
use crate::context::SiteContext;
use crate::palette::BrandPalette;
use crate::section::{RendererRegistry, SectionId};
use crate::sheet::{ConfigMap, Record, SheetData};

/// Meta descriptions are cut to this many characters
pub const META_DESCRIPTION_LEN: usize = 160;

/// Registry with a view-model renderer for every known section
pub fn registry() -> RendererRegistry<Value> {
    RendererRegistry::new()
        .register(SectionId::General, general)
        .register(SectionId::Nav, nav)
        .register(SectionId::Hero, hero)
        .register(SectionId::About, about)
        .register(SectionId::Services, services)
        .register(SectionId::Testimonials, testimonials)
        .register(SectionId::Team, team)
        .register(SectionId::Gallery, gallery)
        .register(SectionId::Contact, contact)
        .register(SectionId::Footer, footer)
}

fn cfg<'a>(data: &'a SheetData, key: &str) -> &'a str {
    data.config().get(key).map(String::as_str).unwrap_or("")
}

/// Anchor of the contact section, which enquiry links point at
fn contact_anchor(ctx: &SiteContext) -> &str {
    ctx.anchor(SectionId::Contact).unwrap_or("#contact")
}

fn section_header(data: &SheetData) -> Value {
    json!({
        "icon": normalize_icon(cfg(data, "section_label_icon")),
        "label": cfg(data, "section_label"),
        "heading": format_text(cfg(data, "section_heading")),
        "subtitle": format_text(cfg(data, "section_subtitle")),
    })
}

fn links(items: &[Record], ctx: &SiteContext) -> Vec<Value> {
    items
        .iter()
        .map(|item| {
            json!({
                "name": item.get("name"),
                "href": ctx.resolve_link(item.get("link")),
            })
        })
        .collect()
}

fn general(data: &SheetData, _ctx: &SiteContext) -> Value {
    let palette = BrandPalette::from_config(data.config());
    let social: Vec<Value> = data
        .items()
        .iter()
        .filter(|item| !item.get("url").is_empty())
        .map(|item| {
            json!({
                "platform": item.get("platform"),
                "icon": normalize_icon(item.get("icon")),
                "url": item.get("url"),
            })
        })
        .collect();

    json!({
        "css_properties": palette.properties,
        "favicon": cfg(data, "favicon"),
        "seo": {
            "title": cfg(data, "seo_title"),
            "description": cfg(data, "seo_description"),
            "image": cfg(data, "seo_image"),
        },
        "share_bar": cfg(data, "share_bar") != "FALSE",
        "social": social,
    })
}

fn nav(data: &SheetData, ctx: &SiteContext) -> Value {
    let cta_link = cfg(data, "cta_link");
    json!({
        "logo": cfg(data, "logo"),
        "logo_href": ctx.anchor(SectionId::Hero),
        "links": links(data.items(), ctx),
        "cta_text": cfg(data, "cta_text"),
        "cta_href": (!cta_link.is_empty()).then(|| ctx.resolve_link(cta_link)),
    })
}

fn hero(data: &SheetData, ctx: &SiteContext) -> Value {
    let ctas: Vec<Value> = data
        .items()
        .iter()
        .map(|cta| {
            let class = if cta.get("style") == "secondary" {
                "btn-secondary-custom"
            } else {
                "btn-primary-custom"
            };
            json!({
                "text": cta.get("text"),
                "href": ctx.resolve_link(cta.get("link")),
                "class": class,
            })
        })
        .collect();

    json!({
        "badge": cfg(data, "badge"),
        "heading": format_text(cfg(data, "heading")),
        "description": format_text(cfg(data, "description")),
        "meta_description": plain_text(cfg(data, "description"), META_DESCRIPTION_LEN),
        "image": extract_image_url(cfg(data, "hero_image")),
        "ctas": ctas,
    })
}

fn about(data: &SheetData, ctx: &SiteContext) -> Value {
    let images: Vec<String> = ["about_image", "about_image_2", "about_image_3"]
        .iter()
        .map(|key| extract_image_url(cfg(data, key)))
        .filter(|url| !url.is_empty())
        .collect();
    let values: Vec<Value> = data
        .items()
        .iter()
        .map(|v| {
            json!({
                "icon": normalize_icon(v.get("icon")),
                "title": v.get("title"),
                "description": format_text(v.get("description")),
            })
        })
        .collect();

    json!({
        "label_icon": normalize_icon(cfg(data, "label_icon")),
        "label": cfg(data, "label"),
        "heading": format_text(cfg(data, "heading")),
        "subtitle": format_text(cfg(data, "subtitle")),
        "body": format_text(cfg(data, "body")),
        "cta": cfg(data, "cta"),
        "cta_href": contact_anchor(ctx),
        "images": images,
        "values": values,
    })
}

fn services(data: &SheetData, ctx: &SiteContext) -> Value {
    let contact = contact_anchor(ctx);
    let cards: Vec<Value> = data
        .items()
        .iter()
        .map(|svc| {
            let slug = slugify(svc.get("title"));
            let full = svc.get("description_full");
            json!({
                "slug": slug,
                "icon": normalize_icon(svc.get("icon")),
                "title": svc.get("title"),
                "description_short": format_text(svc.get("description_short")),
                "description_full": format_text(full),
                "has_full": !full.trim().is_empty(),
                "enquire_href": format!("?service={slug}{contact}"),
            })
        })
        .collect();

    json!({ "header": section_header(data), "cards": cards })
}

/// Leading digits of a star cell, so `"4 stars"` reads as 4. Zero or no
/// digits fall back to five.
fn star_count(cell: &str) -> u32 {
    let digits: String = cell.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok().filter(|n| *n > 0).unwrap_or(5)
}

fn testimonials(data: &SheetData, _ctx: &SiteContext) -> Value {
    let quotes: Vec<Value> = data
        .items()
        .iter()
        .map(|t| {
            let stars = star_count(t.get("stars"));
            json!({
                "stars": stars,
                "quote": format_text(t.get("quote")),
                "author": t.get("author"),
                "role": t.get("role"),
            })
        })
        .collect();

    json!({ "header": section_header(data), "quotes": quotes })
}

fn team(data: &SheetData, _ctx: &SiteContext) -> Value {
    let members: Vec<Value> = data
        .items()
        .iter()
        .map(|m| {
            let bio_full = match m.get("bio_full") {
                "" => m.get("bio_short"),
                full => full,
            };
            let photo = extract_image_url(m.get("photo_url"));
            json!({
                "name": m.get("name"),
                "role": m.get("role"),
                "photo": (!photo.is_empty()).then_some(photo),
                "bio_short": format_text(m.get("bio_short")),
                "bio_full": format_text(bio_full),
            })
        })
        .collect();

    json!({ "header": section_header(data), "members": members })
}

fn gallery(data: &SheetData, _ctx: &SiteContext) -> Value {
    let slides: Vec<Value> = data
        .items()
        .iter()
        .filter_map(|item| {
            let url = extract_image_url(item.get("image_url"));
            if url.is_empty() {
                return None;
            }
            let caption = item.get("caption");
            let alt = [item.get("alt"), caption]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or("Gallery image");
            Some(json!({ "url": url, "caption": caption, "alt": alt }))
        })
        .collect();

    json!({ "header": section_header(data), "slides": slides })
}

fn contact(data: &SheetData, _ctx: &SiteContext) -> Value {
    let kv: ConfigMap = if data.config().is_empty() {
        to_key_value(data.items())
    } else {
        data.config().clone()
    };
    let get = |key: &str| kv.get(key).map(String::as_str).unwrap_or("");
    let phone = get("phone");

    json!({
        "label_icon": normalize_icon(get("label_icon")),
        "label": get("label"),
        "heading": format_text(get("heading")),
        "subtitle": format_text(get("subtitle")),
        "sidebar_heading": get("sidebar_heading"),
        "sidebar_text": get("sidebar_text"),
        "phone": phone,
        "phone_href": format!("tel:{}", phone_to_link(phone)),
        "email": get("email"),
        "email_href": format!("mailto:{}", get("email")),
        "area": format_text(get("area")),
        "hours": {
            "weekday": format_text(get("hours_weekday")),
            "saturday": format_text(get("hours_saturday")),
            "sunday": format_text(get("hours_sunday")),
            "note": format_text(get("hours_note")),
        },
    })
}

fn footer(data: &SheetData, ctx: &SiteContext) -> Value {
    let columns: Vec<Value> = data
        .tables()
        .iter()
        .take(2)
        .filter(|t| !t.items.is_empty())
        .map(|t| json!({ "heading": t.heading, "links": links(&t.items, ctx) }))
        .collect();

    json!({
        "logo": cfg(data, "logo"),
        "description": cfg(data, "description"),
        "abn": cfg(data, "abn"),
        "columns": columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SiteContent;
    use crate::sheet::parse_sheet;

    fn render(section: SectionId, csv: &str) -> Value {
        render_with(section, csv, &[])
    }

    /// Render `section` with other sheets loaded alongside it
    fn render_with(section: SectionId, csv: &str, others: &[(SectionId, &str)]) -> Value {
        let data = parse_sheet(csv);
        let mut content = SiteContent::default();
        content.insert(SectionId::Hero, SheetData::default());
        for (id, other) in others {
            content.insert(*id, parse_sheet(other));
        }
        content.insert(section, data.clone());
        let ctx = SiteContext::build(&SectionId::ALL, &content);
        let render = registry().get(section).unwrap();
        render(&data, &ctx)
    }

    #[test]
    fn test_registry_covers_every_section() {
        assert!(registry().validate(&SectionId::ALL).is_ok());
    }

    #[test]
    fn test_hero_view() {
        let csv = "key,value\nbadge,New\ndescription,\"**Care** for\nall\"\nhero_image,\"=IMAGE(\"\"https://x.test/h.jpg\"\")\"\n---\n,,CTAs\ntext,link,style\nBook now,contact,\nOur team,team,secondary\n";
        let view = render(SectionId::Hero, csv);

        assert_eq!(view["badge"], "New");
        assert_eq!(view["description"], "<strong>Care</strong> for<br>all");
        assert_eq!(view["meta_description"], "Care for all");
        assert_eq!(view["image"], "https://x.test/h.jpg");
        assert_eq!(view["ctas"][0]["href"], "#contact");
        assert_eq!(view["ctas"][0]["class"], "btn-primary-custom");
        assert_eq!(view["ctas"][1]["class"], "btn-secondary-custom");
    }

    #[test]
    fn test_footer_view_uses_tables() {
        let csv = "key,value\nabn,12 345\n---\n,Explore\nname,link\nHome,hero\n---\n,Help\nname,link\nFAQ,faq\n";
        let view = render(SectionId::Footer, csv);

        assert_eq!(view["abn"], "12 345");
        assert_eq!(view["columns"][0]["heading"], "Explore");
        assert_eq!(view["columns"][0]["links"][0]["href"], "#top");
        assert_eq!(view["columns"][1]["links"][0]["href"], "#faq");
    }

    #[test]
    fn test_contact_view_from_flat_sheet() {
        let csv = "\"key\",\"value\",\"\"\n\"phone\",\"0400 111 222\",\"\"\n\"email\",\"hi@example.com\",\"\"\n";
        let view = render(SectionId::Contact, csv);

        assert_eq!(view["phone"], "0400 111 222");
        assert_eq!(view["phone_href"], "tel:+61400111222");
        assert_eq!(view["email_href"], "mailto:hi@example.com");
    }

    #[test]
    fn test_gallery_view_skips_rows_without_image() {
        let csv = "key,value\n---\n,,Gallery\nimage_url,caption,alt\nhttps://x.test/1.jpg,Picnic,\n,Orphan caption,\nhttps://x.test/2.jpg,,\n";
        let view = render(SectionId::Gallery, csv);

        let slides = view["slides"].as_array().unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0]["alt"], "Picnic");
        assert_eq!(slides[1]["alt"], "Gallery image");
    }

    #[test]
    fn test_testimonial_stars_default() {
        let csv = "key,value\n---\n,,Reviews\nquote,author,stars\nLovely,Sam,\nGood,Ash,4\n";
        let view = render(SectionId::Testimonials, csv);

        assert_eq!(view["quotes"][0]["stars"], 5);
        assert_eq!(view["quotes"][1]["stars"], 4);
    }

    #[test]
    fn test_testimonial_stars_read_leading_digits() {
        let csv = "key,value\n---\n,,Reviews\nquote,stars\nA,4 stars\nB,0\nC,five\n";
        let view = render(SectionId::Testimonials, csv);

        assert_eq!(view["quotes"][0]["stars"], 4);
        assert_eq!(view["quotes"][1]["stars"], 5);
        assert_eq!(view["quotes"][2]["stars"], 5);
    }

    #[test]
    fn test_contact_view_prefers_config_block() {
        let csv = "key,value\nlabel,Get in Touch\nphone,0400 111 222\nhours_weekday,Mon-Fri **9-5**\nhours_note,Closed public holidays\nsidebar_heading,Talk to us\n---\n,,x\nname\n";
        let view = render(SectionId::Contact, csv);

        assert_eq!(view["label"], "Get in Touch");
        assert_eq!(view["phone"], "0400 111 222");
        assert_eq!(view["phone_href"], "tel:+61400111222");
        assert_eq!(view["sidebar_heading"], "Talk to us");
        assert_eq!(view["hours"]["weekday"], "Mon-Fri <strong>9-5</strong>");
        assert_eq!(view["hours"]["note"], "Closed public holidays");
        assert_eq!(view["hours"]["sunday"], "");
    }

    #[test]
    fn test_contact_view_flat_sheet_has_hours() {
        let csv = "key,value\nhours_saturday,By appointment\nsidebar_text,We reply within a day\n";
        let view = render(SectionId::Contact, csv);

        assert_eq!(view["hours"]["saturday"], "By appointment");
        assert_eq!(view["sidebar_text"], "We reply within a day");
    }

    #[test]
    fn test_services_view_links_to_labelled_contact() {
        let services = "key,value\nsection_label,What We Offer\n---\n,,Services\ntitle,icon,description_short,description_full\nDaily Living,house,Help daily.,Long **text**\nCare,,Short only,\n";
        let contact = "key,value\nlabel,Get in Touch\nphone,0400 111 222\n";
        let view = render_with(
            SectionId::Services,
            services,
            &[(SectionId::Contact, contact)],
        );

        let cards = view["cards"].as_array().unwrap();
        assert_eq!(cards[0]["slug"], "daily-living");
        assert_eq!(cards[0]["icon"], "bi-house");
        assert_eq!(cards[0]["description_short"], "Help daily.");
        assert_eq!(cards[0]["description_full"], "Long <strong>text</strong>");
        assert_eq!(cards[0]["has_full"], true);
        assert_eq!(cards[0]["enquire_href"], "?service=daily-living#get-in-touch");
        assert_eq!(cards[1]["has_full"], false);
        assert_eq!(cards[1]["enquire_href"], "?service=care#get-in-touch");
    }

    #[test]
    fn test_services_view_without_contact_uses_default_anchor() {
        let services = "key,value\n---\n,,Services\ntitle\nCommunity Access\n";
        let view = render(SectionId::Services, services);

        assert_eq!(view["cards"][0]["enquire_href"], "?service=community-access#contact");
    }

    #[test]
    fn test_about_cta_points_at_contact_anchor() {
        let about = "key,value\ncta,Contact us\n";
        let contact = "key,value\nlabel,Get in Touch\n---\n,,x\nname\n";
        let view = render_with(SectionId::About, about, &[(SectionId::Contact, contact)]);

        assert_eq!(view["cta"], "Contact us");
        assert_eq!(view["cta_href"], "#get-in-touch");
    }
}
