//! Static portfolio content.
//!
//! Everything the walkthrough displays lives here as plain literals. Views and
//! terminals turn these tables into paced scripts and command tables.

use crate::core::{Stage, Tone};

/// One line of the welcome boot transcript: text, tone, delay before it in ms.
pub type BootLine = (&'static str, Tone, u64);

/// The scripted login shown before the welcome terminal accepts input.
pub const BOOT_SCRIPT: &[BootLine] = &[
    ("$ ssh eden@portfolio.dev", Tone::Command, 800),
    ("Connecting to DevOps Portfolio Server...", Tone::Muted, 800),
    ("Connection established.", Tone::Success, 800),
    (" ", Tone::Default, 100),
    ("$ cat /etc/motd", Tone::Command, 800),
    (" ", Tone::Default, 400),
    (
        "⚠ WARNING: NOT A REGULAR PORTFOLIO WEBSITE\nThis is an interactive DevOps CI/CD pipeline experience",
        Tone::Warning,
        200,
    ),
    (
        "╔════════════════════════════════════════════╗\n║  WELCOME TO MY DEVOPS PIPELINE PORTFOLIO ║\n╚════════════════════════════════════════════╝",
        Tone::Accent,
        100,
    ),
    (
        "USER: Eden Sitkovetsky\nROLE: DevOps Engineer & Full-Stack Developer\nHi there! 👋 I'm a passionate developer who loves building scalable applications and automating workflows. Instead of creating a traditional portfolio, I've built this interactive experience that mirrors a real DevOps CI/CD pipeline.",
        Tone::Default,
        200,
    ),
];

/// Hint printed under the welcome prompt.
pub const WELCOME_PROMPT_HINT: &str = "Type 'help' for available commands.";

/// A fixed terminal response: command, output text, tone.
pub type CannedResponse = (&'static str, &'static str, Tone);

const ABOUT_TEXT: &str = "Passionate Full-Stack Developer & DevOps Enthusiast building scalable applications and automating workflows.";
const SKILLS_TEXT: &str = "Docker, Kubernetes, Python, Linux, Terraform, React, Next.js, AWS";

/// Exact commands understood by the welcome terminal.
pub const WELCOME_COMMANDS: &[CannedResponse] = &[
    (
        "help",
        "Available commands: ls, whoami, skills, contact, clear, projects, repositories, about, experience, certifications, stats",
        Tone::Warning,
    ),
    (
        "ls",
        "projects/ repositories/ about.txt skills.txt experience/ certifications/ stats/",
        Tone::Info,
    ),
    ("whoami", "Eden Sitkovetsky - DevOps Engineer", Tone::Info),
    ("skills", SKILLS_TEXT, Tone::Success),
    (
        "contact",
        "Email: edensit139@gmail.com | LinkedIn: /in/eden-sitkovetsky",
        Tone::Muted,
    ),
    (
        "projects",
        "DevOps Capstone, RabbitMQ Cluster, ID Profiles Generator, Workflow Notifier, Personal Portfolio",
        Tone::Accent,
    ),
    ("repositories", "github.com/edensitko", Tone::Info),
    ("about", ABOUT_TEXT, Tone::Muted),
    (
        "experience",
        "Full-Stack Developer (Freelance), DevOps Engineer (Simulation), System Administrator",
        Tone::Muted,
    ),
    (
        "certifications",
        "IBM DevOps Professional, AWS Cloud Practitioner, HashiCorp Terraform Associate",
        Tone::Warning,
    ),
    (
        "stats",
        "CPU: 12% | MEM: 45% | UPTIME: 99.9% | DEPLOYMENTS: 42",
        Tone::Success,
    ),
];

/// Files the welcome terminal can `cat`.
pub const WELCOME_FILES: &[CannedResponse] = &[
    ("about.txt", ABOUT_TEXT, Tone::Muted),
    ("skills.txt", SKILLS_TEXT, Tone::Success),
    (
        "/etc/motd",
        "╔══════════════════════════════════════════════════════════════╗\n║          WELCOME TO THE DEVOPS PIPELINE PORTFOLIO           ║\n╚══════════════════════════════════════════════════════════════╝",
        Tone::Accent,
    ),
];

/// Commands that leave the welcome terminal and start the pipeline.
pub const LAUNCH_ALIASES: &[&str] = &["./start-pipeline.sh", "start", "pipeline", "execute", "enter"];

/// Banner of the floating terminal.
pub const FLOATING_BANNER: &[&str] = &[
    "Welcome to DevOps Terminal v1.0.0",
    "Type \"help\" for available commands",
];

/// Exact commands understood by the floating terminal.
pub const FLOATING_COMMANDS: &[CannedResponse] = &[
    (
        "help",
        "Available commands:\n  help      - Show this help message\n  about     - About this portfolio\n  skills    - List technical skills\n  contact   - Get contact information\n  clear     - Clear terminal\n  whoami    - Display user info",
        Tone::Default,
    ),
    (
        "about",
        "DevOps Engineer & Cloud Architect\nBuilding scalable infrastructure and automation solutions",
        Tone::Default,
    ),
    (
        "skills",
        "Technical Skills:\n  • Cloud: AWS, Azure, GCP\n  • Containers: Docker, Kubernetes\n  • IaC: Terraform, CloudFormation\n  • CI/CD: GitHub Actions, Jenkins\n  • Monitoring: Prometheus, Grafana",
        Tone::Default,
    ),
    (
        "contact",
        "Email: contact@edensitko.com\nWebsite: https://edensitko.com",
        Tone::Default,
    ),
    ("whoami", "devops-engineer@portfolio:~$", Tone::Default),
];

/// Short description of each stage on the plan roadmap.
#[must_use]
pub const fn roadmap_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Plan => "Blueprint & Strategy",
        Stage::Code => "About Me",
        Stage::Build => "Services Catalog",
        Stage::Test => "Tech Stack & Skills",
        Stage::Release => "Professional Journey",
        Stage::Deploy => "Projects Gallery",
        Stage::Operate => "Certifications",
        Stage::Monitor => "Contact & CV",
    }
}

/// The architecture sketch on the plan stage.
pub const ARCHITECTURE: &[&str] = &["Next.js App", "GitHub Action", "Docker", "GitHub Pages"];

/// The about-me source listing on the code stage.
pub const CODE_LINES: &[(&str, Tone)] = &[
    ("// ABOUT_ME.TSX", Tone::Success),
    ("", Tone::Default),
    ("export const AboutMe = () => {", Tone::Accent),
    ("  const greeting = \"Hi, my name is Eden Sitkovetsky\"", Tone::Default),
    ("", Tone::Default),
    ("  const intro = `", Tone::Accent),
    ("    Hi, I'm Eden Sitkovetsky – a passionate", Tone::Info),
    ("    Full-Stack Developer & DevOps enthusiast", Tone::Info),
    ("    with a strong background in web, mobile,", Tone::Info),
    ("    and cloud-based development.", Tone::Info),
    ("", Tone::Default),
    ("    This portfolio showcases my work across", Tone::Info),
    ("    multiple domains including:", Tone::Info),
    ("  `;", Tone::Accent),
    ("", Tone::Default),
    ("  const domains = [", Tone::Accent),
    ("    {", Tone::Muted),
    ("      title: \"⚙️ DevOps & Cloud Infrastructure\",", Tone::Default),
    ("      description:", Tone::Default),
    ("        \"Projects involving Terraform, Docker, AWS,\"", Tone::Info),
    ("        + \" CI/CD pipelines, Prometheus, and Alerting systems.\"", Tone::Info),
    ("    },", Tone::Muted),
    ("", Tone::Default),
    ("    {", Tone::Muted),
    ("      title: \"📱 Mobile App Development\",", Tone::Default),
    ("      description:", Tone::Default),
    ("        \"Beautiful and functional apps built with Flutter\"", Tone::Info),
    ("        + \" and Firebase, tailored for real-world needs\"", Tone::Info),
    ("        + \" like scheduling, chat, and more.\"", Tone::Info),
    ("    },", Tone::Muted),
    ("", Tone::Default),
    ("    {", Tone::Muted),
    ("      title: \"🌐 Web Development\",", Tone::Default),
    ("      description:", Tone::Default),
    ("        \"Interactive web apps and SaaS platforms built\"", Tone::Info),
    ("        + \" with React, Next.js, Node.js, and integrated\"", Tone::Info),
    ("        + \" AI tools (OpenAI, Serverless).\"", Tone::Info),
    ("    },", Tone::Muted),
    ("", Tone::Default),
    ("    {", Tone::Muted),
    ("      title: \"🧠 AI & Automation\",", Tone::Default),
    ("      description:", Tone::Default),
    ("        \"Smart systems using OpenAI, automation scripts,\"", Tone::Info),
    ("        + \" and prompt-based tools to streamline workflows\"", Tone::Info),
    ("        + \" and enhance user experience.\"", Tone::Info),
    ("    }", Tone::Muted),
    ("  ];", Tone::Accent),
    ("", Tone::Default),
    ("  return (", Tone::Accent),
    ("    <Portfolio", Tone::Default),
    ("      greeting={greeting}", Tone::Default),
    ("      intro={intro}", Tone::Default),
    ("      domains={domains}", Tone::Default),
    ("    />", Tone::Default),
    ("  );", Tone::Accent),
    ("};", Tone::Accent),
];

/// Each code line waits this much longer than the one before it, in ms.
pub const CODE_LINE_STEP_MS: u64 = 5;

/// The command typed at the top of the build stage.
pub const SERVICES_COMMAND: &str = "$ cat services.txt";

/// A service listed on the build stage.
#[derive(Debug, Clone, Copy)]
pub struct Service {
    /// Numbered title, typed out.
    pub title: &'static str,
    /// Description lines.
    pub lines: &'static [&'static str],
}

/// The services catalog.
pub const SERVICES: &[Service] = &[
    Service {
        title: "01 • CLOUD ENGINEERING",
        lines: &[
            "Designing and implementing scalable solutions on AWS,",
            "Azure, and GCP. Expertise in EC2, S3, Lambda, IAM, and",
            "cloud-native architectures.",
        ],
    },
    Service {
        title: "02 • DEVOPS & CI/CD",
        lines: &[
            "Setting up automated pipelines with GitHub Actions,",
            "Azure DevOps, Jenkins. Containerization with Docker and",
            "orchestration with Kubernetes.",
        ],
    },
    Service {
        title: "03 • WEB DEVELOPMENT",
        lines: &[
            "Full-stack development with JavaScript/TypeScript,",
            "React, Node.js, and modern frameworks. RESTful APIs and",
            "database integration.",
        ],
    },
    Service {
        title: "04 • INFRASTRUCTURE AS CODE",
        lines: &[
            "Automating infrastructure provisioning with Terraform,",
            "CloudFormation, and AWS CDK. Configuration management",
            "with Ansible.",
        ],
    },
    Service {
        title: "05 • DATABASE MANAGEMENT",
        lines: &[
            "Design and optimization of relational and NoSQL",
            "databases. Experience with MySQL, DynamoDB, Redshift,",
            "and data warehousing solutions.",
        ],
    },
    Service {
        title: "06 • SYSTEM ADMINISTRATION",
        lines: &[
            "Managing Windows and Linux servers, networking",
            "infrastructure, security implementations, and",
            "performance optimization.",
        ],
    },
];

/// A skill category presented as a test suite.
#[derive(Debug, Clone, Copy)]
pub struct SkillSuite {
    /// Suite name.
    pub name: &'static str,
    /// Word shown next to PASS.
    pub verdict: &'static str,
    /// Skills in the suite.
    pub items: &'static [&'static str],
}

/// The test stage suites, in run order.
pub const SKILL_SUITES: &[SkillSuite] = &[
    SkillSuite {
        name: "Operating Systems",
        verdict: "Kernel",
        items: &["Linux", "Windows", "macOS"],
    },
    SkillSuite {
        name: "Software & Tools",
        verdict: "Verified",
        items: &[
            "VS Code", "GitHub", "Xcode", "Terraform", "Ansible", "Jenkins", "Kubernetes", "Docker",
            "VMware", "WordPress", "Figma",
        ],
    },
    SkillSuite {
        name: "Cloud & Database",
        verdict: "Connected",
        items: &["AWS", "Firebase", "MySQL", "PostgreSQL", "MongoDB"],
    },
    SkillSuite {
        name: "Programming Languages",
        verdict: "Compiled",
        items: &[
            "Python", "Node.js", "JavaScript", "TypeScript", "Bash", "HTML", "PHP", "CSS", "Dart", "C",
        ],
    },
    SkillSuite {
        name: "Frameworks",
        verdict: "Built",
        items: &["Express.js", "Apache", "Flask", "React", "Next.js", "Angular", "Flutter"],
    },
];

/// How long each suite runs, in ms.
pub const SUITE_RUN_MS: u64 = 600;
/// Pause between suites, in ms.
pub const SUITE_PAUSE_MS: u64 = 200;

/// A position presented as a release.
#[derive(Debug, Clone, Copy)]
pub struct Release {
    /// Version tag.
    pub version: &'static str,
    /// Job title.
    pub role: &'static str,
    /// Employer.
    pub company: &'static str,
    /// Date range.
    pub period: &'static str,
    /// Release notes.
    pub notes: &'static str,
}

/// Work history, newest first.
pub const RELEASES: &[Release] = &[
    Release {
        version: "v25.03",
        role: "DevOps Engineer",
        company: "Auraframe.art",
        period: "Mar 2025 - Present",
        notes: "Develop cloud infrastructure with Terraform and Jenkins, deploy apps using Docker and Kubernetes, and automate workflows with Python, Bash, and Ansible. Working with AWS services to build scalable and reliable infrastructure solutions.",
    },
    Release {
        version: "v25.01",
        role: "IT Help Desk",
        company: "Ramat Gan municipality",
        period: "Jan 2025 - Mar 2025",
        notes: "Providing support for Windows/Linux systems, network issues, and Microsoft applications. Managing user accounts (Active Directory), remote assistance, system imaging, hardware troubleshooting, and BIOS configuration.",
    },
    Release {
        version: "v24.10",
        role: "IT Support Coordinator",
        company: "Election Committee",
        period: "Oct 2024 - Jan 2025",
        notes: "Provided end-user support including application troubleshooting, system setup (Windows/Linux), image deployment, and network configuration. Assisted users with onboarding and ensured smooth usage of internal systems and software.",
    },
    Release {
        version: "v23.11",
        role: "Website Developer",
        company: "morevision.ai",
        period: "Nov 2023 - Sep 2024",
        notes: "Built and maintained websites for company clients using WordPress, HTML, CSS, PHP and JavaScript. Collaborated with the development team to create effective UI/UX designs. Specialized in full-stack web development and optimized sites for performance and SEO.",
    },
];

/// Deployment timeline steps with the delay before each, in ms.
pub const DEPLOY_STEPS: &[(&str, u64)] = &[
    ("Building Docker images...", 300),
    ("Pushing to registry...", 250),
    ("Deploying to production...", 300),
    ("Running health checks...", 200),
    ("✓ Deployment successful!", 300),
];

/// Pause between the last deploy step and the project list, in ms.
pub const DEPLOY_SETTLE_MS: u64 = 400;

/// A project card on the deploy stage.
#[derive(Debug, Clone, Copy)]
pub struct Project {
    /// Title.
    pub title: &'static str,
    /// One-paragraph summary.
    pub summary: &'static str,
    /// Source repository.
    pub repository: &'static str,
    /// Live site, if any.
    pub live: Option<&'static str>,
    /// Technologies.
    pub tags: &'static [&'static str],
}

/// The projects gallery.
pub const PROJECTS: &[Project] = &[
    Project {
        title: "🎓 DevOps Capstone Project",
        summary: "Production-ready RESTful microservice for account management with Flask. Features TDD (95%+ coverage), CI/CD via GitHub Actions & Tekton, containerization, and Kubernetes orchestration. Part of IBM DevOps Professional Certificate.",
        repository: "https://github.com/edensitko/devops-capstone-project",
        live: None,
        tags: &["Python", "Flask", "PostgreSQL", "Docker", "Kubernetes", "Tekton"],
    },
    Project {
        title: "🐇 RabbitMQ Cluster on AWS",
        summary: "Highly available RabbitMQ cluster automated with Terraform on AWS. implemented using Auto Scaling Groups, Application Load Balancer, and Docker for a robust, scalable messaging infrastructure.",
        repository: "https://github.com/edensitko/terraform-rabbitmq-cluster",
        live: None,
        tags: &["Terraform", "AWS", "RabbitMQ", "Docker", "ASG"],
    },
    Project {
        title: "🛠️ ID Profiles Generator",
        summary: "Modern full-stack application for generating ID profiles, built with React (Next.js), Flask, Docker, and Kubernetes (Helm). Supports local development and cloud-native deployment with robust CI/CD pipelines.",
        repository: "https://github.com/edensitko/id-profiles-generator",
        live: None,
        tags: &["React", "Flask", "Kubernetes", "Helm", "Docker"],
    },
    Project {
        title: "🌐 Workflow Notifier",
        summary: "Multi-channel notification system (Discord, Slack, Telegram) for Terraform operations and CI/CD events. Features template-based alerts, robust error handling, and seamless GitHub Actions integration via repository_dispatch.",
        repository: "https://github.com/edensitko/workflow-notifier",
        live: None,
        tags: &["Shell", "GitHub Actions", "Terraform", "Discord", "Slack", "Telegram"],
    },
    Project {
        title: "🎨 Personal Portfolio",
        summary: "Modern, responsive personal portfolio website built with Next.js 14 and Tailwind CSS. Features Firebase Hosting deployment, analytics integration, and optimized static export for high performance.",
        repository: "https://github.com/edensitko/myPortfolio",
        live: Some("https://edensitko.com"),
        tags: &["Next.js 14", "Tailwind CSS", "Firebase", "React"],
    },
    Project {
        title: "🧠 Skreep - AI Solutions",
        summary: "Real-world website and AI chatbot developed for a client using Next.js and Tailwind CSS. Features custom AI implementation, full Hebrew/RTL support, and production deployment on Vercel.",
        repository: "https://github.com/edensitko/skreep",
        live: Some("https://skreep.com"),
        tags: &["Next.js", "Tailwind CSS", "AI", "Vercel", "RTL"],
    },
];

/// A credential on the operate stage: title, issuer, date.
pub type Credential = (&'static str, &'static str, &'static str);

/// Certifications, newest first.
pub const CERTIFICATIONS: &[Credential] = &[
    ("Google AI Essentials", "Google", "Jan 2026"),
    ("DevOps and Software Engineering", "IBM", "Jan 2026"),
    ("DevOps, Cloud, and Agile Foundations", "IBM", "Nov 2025"),
];

/// Education: degree, school, dates.
pub const EDUCATION: &[Credential] = &[
    ("DevOps Course", "TRTech", "2023 - 2024"),
    ("Full Stack Development", "John Bryce", "Jan 2023 - Aug 2023"),
];

/// Public contact address shown on the monitor stage.
pub const CONTACT_EMAIL: &str = "edensit139@gmail.com";

/// Downloadable CV offered on the monitor stage.
pub const CV_PATH: &str = "/Eden Sitkovetsky.pdf";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_boot_script_total_delay() {
        let total: u64 = BOOT_SCRIPT.iter().map(|(_, _, delay)| delay).sum();
        assert_eq!(total, 4_200);
    }

    #[test]
    fn test_command_tables_have_unique_keys() {
        for table in [WELCOME_COMMANDS, WELCOME_FILES, FLOATING_COMMANDS] {
            let keys: HashSet<_> = table.iter().map(|(cmd, _, _)| *cmd).collect();
            assert_eq!(keys.len(), table.len());
        }
    }

    #[test]
    fn test_every_stage_has_a_roadmap_label() {
        for stage in Stage::ALL {
            assert!(!roadmap_label(stage).is_empty());
        }
    }
}
