//! Deterministic outline used when the text service is unavailable.
//!
//! The template slides go through the regular validator normalization, so
//! the result obeys the same invariants as a generated outline. They are
//! built as `Slide`s directly; the topic is never re-parsed as outline text.

use super::validator;
use crate::models::outline::{ContentDepth, DeckConfig, Outline, Slide};

struct Template {
    title: &'static str,
    bullets: &'static [&'static str],
}

const BASIC: [Template; 6] = [
    Template {
        title: "Introduction & Overview: {topic}",
        bullets: &[
            "Core concept definition and overview of {topic}",
            "Main purpose and primary applications",
            "Key benefits and why they matter",
        ],
    },
    Template {
        title: "Fundamental Concepts & Principles",
        bullets: &[
            "Primary principles and supporting concepts",
            "Basic functionality and key features",
            "Simple examples and common use cases",
        ],
    },
    Template {
        title: "Practical Applications & Use Cases",
        bullets: &[
            "Implementation approach and basic requirements",
            "Common use cases and application scenarios",
            "Success factors and best practices",
        ],
    },
    Template {
        title: "Key Benefits & Competitive Advantages",
        bullets: &[
            "Primary advantages over existing alternatives",
            "Efficiency improvements and cost savings",
            "Better user experience and value creation",
        ],
    },
    Template {
        title: "Implementation Steps & Requirements",
        bullets: &[
            "Initial setup and configuration requirements",
            "Deployment process and timeline overview",
            "Training needs and adoption strategy",
        ],
    },
    Template {
        title: "Summary & Next Steps",
        bullets: &[
            "Key takeaways and main points",
            "Recommended actions and immediate priorities",
            "Future considerations and expansion opportunities",
        ],
    },
];

const DETAILED: [Template; 6] = [
    Template {
        title: "Strategic Analysis Overview: {topic}",
        bullets: &[
            "Analysis of {topic} market position and competitive landscape",
            "Key industry trends and emerging opportunities worth pursuing now",
            "Strategic importance and business impact for the organization",
            "Implementation challenges and a framework for practical solutions",
        ],
    },
    Template {
        title: "Technical Framework & Architecture",
        bullets: &[
            "Technical architecture overview and mapping of component relationships",
            "Methodology explanation together with implementation best practices",
            "Case study analysis drawing on real-world application examples",
            "Performance metrics definition and clear success measurement criteria",
        ],
    },
    Template {
        title: "Implementation Strategy & Planning",
        bullets: &[
            "Phased implementation approach with timeline and milestone planning",
            "Resource allocation strategy and recommended team structure",
            "Risk assessment framework paired with mitigation strategy development",
            "Success metrics tracking and a continuous improvement framework",
        ],
    },
    Template {
        title: "Market Analysis & Competitive Positioning",
        bullets: &[
            "Target market segmentation and analysis of customer needs",
            "Competitive landscape assessment and a clear differentiation strategy",
            "Market opportunity sizing and evaluation of growth potential",
            "Strategic positioning and development of the value proposition",
        ],
    },
    Template {
        title: "Operational Excellence & Efficiency",
        bullets: &[
            "Process optimization and targeted efficiency improvement initiatives",
            "Quality management and ongoing performance monitoring systems",
            "Resource utilization and capacity planning strategies for growth",
            "Continuous improvement and practical innovation implementation",
        ],
    },
    Template {
        title: "Future Outlook & Strategic Recommendations",
        bullets: &[
            "Emerging trends analysis and likely future market developments",
            "Strategic recommendations and clear implementation priorities",
            "Long-term vision and identification of growth opportunities",
            "Next steps and an action plan for immediate execution",
        ],
    },
];

const COMPREHENSIVE: [Template; 6] = [
    Template {
        title: "Executive Strategic Overview: {topic}",
        bullets: &[
            "Market analysis of {topic} with current industry trends and competitive landscape assessment",
            "Business case development with ROI calculation, financial projections, and investment justification",
            "Implementation roadmap detailing a phased approach, resource allocation strategy, and milestone tracking",
            "Stakeholder impact analysis covering change management, training requirements, and communication strategy",
            "Performance measurement framework defining KPIs, success metrics, and continuous improvement processes",
        ],
    },
    Template {
        title: "Technical Architecture & Innovation Strategy",
        bullets: &[
            "Technical infrastructure design including scalability considerations, integration points, and future-proofing strategies",
            "Innovation adoption framework covering emerging technologies, partnership opportunities, and competitive positioning",
            "Data analytics implementation with business intelligence tools, predictive modeling, and real-time dashboards",
            "Security and compliance framework addressing regulatory requirements, data protection, and risk management",
            "Change management strategy detailing organizational transformation, training programs, and adoption measurement",
        ],
    },
    Template {
        title: "Financial Analysis & Business Impact Assessment",
        bullets: &[
            "Financial modeling including revenue projections, cost analysis, break-even calculation, and sensitivity analysis",
            "Investment justification covering capital expenditure, operational costs, ROI timeline, and payback period",
            "Risk assessment matrix identifying operational, financial, technical, and market risks with impact analysis",
            "Stakeholder value proposition detailing concrete benefits for customers, employees, shareholders, and partners",
            "Strategic alignment analysis connecting the initiative to organizational goals and long-term growth objectives",
        ],
    },
    Template {
        title: "Implementation Excellence & Project Management Framework",
        bullets: &[
            "Project management methodology with an agile approach, sprint planning, and a clear governance structure",
            "Quality assurance framework covering testing protocols, performance benchmarks, and user acceptance criteria",
            "Team structure and capability development outlining roles, responsibilities, skills, and training programs",
            "Vendor and partnership strategy detailing selection criteria, contract management, and performance monitoring",
            "Operational excellence framework covering process optimization, automation opportunities, and service level agreements",
        ],
    },
    Template {
        title: "Strategic Risk Management & Mitigation Planning",
        bullets: &[
            "Risk identification process covering operational, financial, technical, and market-related challenges across the program",
            "Risk assessment methodology using a probability-impact matrix and supporting quantitative analysis techniques",
            "Mitigation strategy development with contingency planning and alternative scenario analysis for key risks",
            "Monitoring and control framework with early warning indicators and well-defined escalation procedures",
            "Business continuity planning that ensures operational resilience and tested disaster recovery capabilities",
        ],
    },
    Template {
        title: "Performance Optimization & Strategic Roadmap",
        bullets: &[
            "Performance benchmarking against industry standards and competitor analysis to drive continuous improvement",
            "Optimization strategies focusing on efficiency gains, cost reduction, and new value enhancement opportunities",
            "Technology roadmap aligned with business strategy and the most relevant emerging innovation trends",
            "Talent development and capability building programs that sustain long-term competitive advantage",
            "Long-term strategic vision with measurable objectives and milestone tracking mechanisms for leadership",
        ],
    },
];

fn templates(depth: ContentDepth) -> &'static [Template; 6] {
    match depth {
        ContentDepth::Basic => &BASIC,
        ContentDepth::Detailed => &DETAILED,
        ContentDepth::Comprehensive => &COMPREHENSIVE,
    }
}

/// Template slides with the topic filled in, before normalization.
pub fn fallback_slides(config: &DeckConfig) -> Vec<Slide> {
    let topic = config.topic.split_whitespace().collect::<Vec<_>>().join(" ");
    let fill = |text: &str| text.replace("{topic}", &topic);
    templates(config.content_depth)
        .iter()
        .take(config.slide_count)
        .map(|template| {
            Slide::new(
                fill(template.title),
                template.bullets.iter().map(|b| fill(b)).collect(),
            )
        })
        .collect()
}

pub fn fallback_outline(config: &DeckConfig) -> Outline {
    log::warn!(
        "Using fallback outline for {:?} ({} slides, {})",
        config.topic,
        config.slide_count,
        config.content_depth
    );
    validator::normalize(fallback_slides(config), config)
}
